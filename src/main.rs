//! Terminal simulator for the board engine. Stands in for the physical
//! collaborators: `lift`/`place` commands flip the simulated presence
//! sensors and an in-memory strip records what the LEDs would show.

use std::io;
use std::io::prelude::*;

use hallboard::board::core::Square;
use hallboard::board::lights::MemoryStrip;
use hallboard::Game;

fn main() {
    println!("hallboard {}", env!("CARGO_PKG_VERSION"));
    let mut game = Game::new();
    let mut sensors = game.registry().occupancy();
    let mut strip = MemoryStrip::new();
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.unwrap();
        if let Some(square) = line.strip_prefix("lift ") {
            match Square::try_from(square) {
                Ok(square) => sensors.set(square, false),
                Err(e) => {
                    println!("error: {e}");
                    continue;
                },
            }
        } else if let Some(square) = line.strip_prefix("place ") {
            match Square::try_from(square) {
                Ok(square) => sensors.set(square, true),
                Err(e) => {
                    println!("error: {e}");
                    continue;
                },
            }
        } else if line == "board" {
            println!("{}", game.registry());
            continue;
        } else if line == "lights" {
            println!("{strip}");
            continue;
        } else if line == "status" {
            println!("{} to move, {:?}", game.side_to_move(), game.mode());
            continue;
        } else if line == "reset" {
            game.reset();
            sensors = game.registry().occupancy();
        } else if line == "quit" {
            break;
        } else {
            println!("unknown command: {line}");
            continue;
        }
        if let Err(e) = game.process(sensors, &mut strip) {
            println!("board error: {e}");
        }
    }
}
