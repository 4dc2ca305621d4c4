use anyhow::Context;
use chrono::{Duration, Utc};
use incidentmap::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Drives the incident map against the in-memory engine without any UI.
///
/// Usage: `cargo run --example headless [incidents.json]`
/// The optional file holds a JSON array of incidents.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("🗺️ Incident Map Headless Example");
    println!("================================");

    let incidents = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading incidents from {}", path))?;
            serde_json::from_str::<Vec<Incident>>(&raw)
                .with_context(|| format!("parsing incidents in {}", path))?
        }
        None => sample_incidents(),
    };

    let factory = InMemoryEngineFactory::new();
    let mut map = IncidentMap::new(
        factory.clone(),
        MemoryCredentialStore::new(),
        IncidentMapConfig::default(),
    )?;
    map.mount(Container::new("map", 480))?;
    println!("View before credential: {:?}", map.view());

    map.submit_credential("pk.demo")?;
    map.set_incidents(incidents);
    println!("View after credential:  {:?}", map.view());

    // The engine reports the style as loaded; queued work runs now
    map.handle_event(SurfaceEvent::Loaded);
    println!("Sync state: {:?}", map.sync_state());

    if let Some(engine) = map.surface().and_then(|s| s.engine()) {
        if let Some(source) = engine.source("incidents") {
            println!(
                "✅ Density source: {} features, total intensity {:.2}",
                source.len(),
                source.total_intensity()
            );
            if let Some(bounds) = source.bounds() {
                println!("   Bounds center: {}", bounds.center());
            }
        }
        for marker in engine.incident_markers() {
            if let Some(popup) = &marker.popup {
                println!("   📍 {} {}", marker.position, popup.to_text().replace('\n', " | "));
            }
        }
    }

    // Picking mode
    let picked = Rc::new(RefCell::new(Vec::new()));
    let sink = picked.clone();
    map.set_on_select(move |location| sink.borrow_mut().push(location));
    map.set_picking(true);

    println!("\n🎯 Picking locations:");
    for (lat, lng) in [(40.72, -74.01), (40.73, -74.02)] {
        map.handle_event(SurfaceEvent::click(lat, lng));
    }
    for location in picked.borrow().iter() {
        println!("   Picked {}", location);
    }
    if let (Some(location), Some(surface)) = (map.selected_location(), map.surface_mut()) {
        surface.fly_to(location, Some(15.0))?;
    }

    map.unmount();
    let stats = factory.stats();
    println!("\n🧹 After unmount: {:?}", stats.borrow());

    Ok(())
}

fn sample_incidents() -> Vec<Incident> {
    let now = Utc::now();
    vec![
        Incident::new(
            "1",
            LatLng::new(40.7128, -74.0060),
            Severity::High,
            Category::Theft,
            "Phone snatched near the subway entrance",
            now - Duration::hours(2),
        )
        .with_location_description("Chambers St station"),
        Incident::new(
            "2",
            LatLng::new(40.7306, -73.9866),
            Severity::Medium,
            Category::Harassment,
            "Verbal harassment reported on the corner",
            now - Duration::hours(5),
        ),
        Incident::new(
            "3",
            LatLng::new(40.7580, -73.9855),
            Severity::Critical,
            Category::Assault,
            "Altercation outside a venue",
            now - Duration::minutes(40),
        ),
        Incident::new(
            "4",
            LatLng::new(40.6892, -74.0445),
            Severity::Low,
            Category::SuspiciousActivity,
            "Unattended bag reported to staff",
            now - Duration::days(1),
        ),
    ]
}
