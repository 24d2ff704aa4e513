use assert_cmd::Command;
use predicates::boolean::PredicateBooleanExt;
use predicates::str::contains;

const BINARY_NAME: &str = "hallboard";

#[test]
fn pickup_lights_candidates() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("lift b2\nlights\nstatus\nquit\n")
            .assert()
            .success()
            .stdout(
                // b3 and b4 on the serpentine strip.
                contains("led 17: quiet")
                    .and(contains("led 30: quiet"))
                    .and(contains("red to move, AwaitingPlacement")),
            ),
    );
}

#[test]
fn quiet_move_commits_on_placement() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("lift e2\nplace e4\nstatus\nlights\nboard\nquit\n")
            .assert()
            .success()
            .stdout(
                contains("blue to move, AwaitingPickup")
                    .and(contains("all off"))
                    .and(contains("P P P P . P P P")),
            ),
    );
}

#[test]
fn malformed_square_is_reported() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("lift z9\nquit\n")
            .assert()
            .success()
            .stdout(contains("error:")),
    );
}
