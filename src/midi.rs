//! MIDI output transport.
//!
//! One-shot by design: open the first available output port (optionally
//! filtered by name), send a single message, drop the connection. The
//! module never answers, so there is nothing worth keeping open.

use midir::MidiOutput;

/// Send `bytes` to the first matching MIDI output port. Returns the name
/// of the port the message went to.
pub fn send(bytes: &[u8], port_filter: Option<&str>) -> anyhow::Result<String> {
    let midi_out = MidiOutput::new("tram8map")?;
    let ports = midi_out.ports();
    if ports.is_empty() {
        anyhow::bail!("no MIDI output devices found");
    }

    let mut chosen = None;
    for port in &ports {
        let name = match midi_out.port_name(port) {
            Ok(name) => name,
            Err(_) => continue,
        };
        if let Some(filter) = port_filter
            && !name.contains(filter)
        {
            continue;
        }
        chosen = Some((port.clone(), name));
        break;
    }
    let Some((port, name)) = chosen else {
        anyhow::bail!(
            "no MIDI output matches '{}'",
            port_filter.unwrap_or_default()
        );
    };

    let mut conn = match midi_out.connect(&port, "tram8map-send") {
        Ok(conn) => conn,
        Err(e) => anyhow::bail!("failed to open MIDI output {name}: {e}"),
    };
    if let Err(e) = conn.send(bytes) {
        anyhow::bail!("send to {name} failed: {e}");
    }
    log::info!("Sent {} bytes to {name}", bytes.len());
    Ok(name)
}

/// `ports` subcommand: list the available MIDI output devices.
pub fn list_outputs() -> anyhow::Result<()> {
    println!("=== MIDI Output Devices ===");
    let midi_out = MidiOutput::new("tram8map-enumerate")?;
    let ports = midi_out.ports();
    if ports.is_empty() {
        println!("  (none found)");
    }
    for port in &ports {
        let name = midi_out.port_name(port).unwrap_or_else(|_| "Unknown".into());
        println!("  {name}");
    }
    Ok(())
}
