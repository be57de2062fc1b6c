//! Live monitor: print virtual-sensor readings from nearby probes
//!
//! Run with: cargo run --example monitor

use probecast::{BleScanner, PacketEvent, ProbeMode, Result};
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("probecast=debug".parse().unwrap()),
        )
        .init();

    let scanner = BleScanner::new().await?;
    let mut events = scanner.subscribe();
    scanner.start_scanning().await?;

    println!("Scanning for probe advertisements.");
    println!("Make sure your probe is out of the charger!");
    println!("Press Ctrl+C to exit.\n");

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(event) => print_packet(&event),
                    Err(RecvError::Lagged(n)) => eprintln!("(dropped {} packets)", n),
                    Err(RecvError::Closed) => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\nInterrupted!");
                break;
            }
        }
    }

    scanner.stop_scanning().await?;
    println!("Done!");

    Ok(())
}

fn print_packet(event: &PacketEvent) {
    let packet = &event.packet;

    match packet.mode {
        ProbeMode::Normal => {
            let sel = &packet.virtual_sensors;
            if let (Some(core), Some(surface), Some(ambient)) = (
                packet.virtual_core(),
                packet.virtual_surface(),
                packet.virtual_ambient(),
            ) {
                // Unit conversion is up to the consumer; this one likes °F
                println!(
                    "{}: core({})={:.2}°F, surface({})={:.2}°F, ambient({})={:.2}°F",
                    packet.serial_number,
                    sel.core_sensor_name(),
                    fahrenheit(core),
                    sel.surface_sensor_name(),
                    fahrenheit(surface),
                    sel.ambient_sensor_name(),
                    fahrenheit(ambient),
                );
            }
        }
        ProbeMode::InstantRead => {
            println!(
                "{}: instant read {:.2}°F",
                packet.serial_number,
                fahrenheit(packet.temperatures[0]),
            );
        }
        ProbeMode::Reserved | ProbeMode::Error => {}
    }

    if !packet.battery_ok {
        println!("{}: battery low", packet.serial_number);
    }
    if packet.is_any_overheating() {
        println!("{}: overheating {:?}", packet.serial_number, packet.overheating);
    }
}

fn fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}
