use cellstore::geojson::cells_to_feature_collection;
use cellstore::{PoiStore, Region, Room};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug to see detailed logs)
    env_logger::init();

    println!("=== Cellstore - Getting Started ===\n");

    // Create a store backed by a file in a temporary directory
    let dir = tempfile::tempdir()?;
    let store = PoiStore::open(dir.path().join("poi.redb"))?;
    println!("✓ Opened store in {}\n", dir.path().display());

    // === STORING ROOMS ===
    println!("1. Storing Rooms");
    println!("----------------");

    let cities = [
        (1u64, "EUR", "Rotterdam", 51.9244, 4.4777),
        (2, "EUR", "Amsterdam", 52.3676, 4.9041),
        (3, "EUR", "Utrecht", 52.0907, 5.1214),
        (4, "EUR", "Palma", 39.5696, 2.6502),
    ];
    for (id, currency, address, lat, lng) in cities {
        store.store(Room::new(id, currency, address, lat, lng), lat, lng)?;
    }
    println!(
        "   Stored {} rooms with automatic cell indexing\n",
        cities.len()
    );

    // === RADIUS QUERIES ===
    println!("2. Radius Queries");
    println!("-----------------");

    let nearby = store.find_in_radius(51.9244, 4.4777, 50_000.0)?;
    println!("   Rooms in the 50km covering around Rotterdam:");
    for (cell, room) in &nearby {
        println!("     - {} (cell {})", room.address, cell.to_token());
    }
    println!();

    // === RECTANGLE QUERIES ===
    println!("3. Rectangle Queries");
    println!("--------------------");

    let randstad = store.find_in_rect((51.8, 4.3), (52.5, 5.2))?;
    println!("   Rooms in the Randstad rectangle: {}", randstad.len());
    for (_, room) in &randstad {
        println!("     - {}", room.address);
    }
    println!();

    // === NEAREST ROOMS ===
    println!("4. Nearest Rooms");
    println!("----------------");

    let nearest = store.find_nearest(52.0, 4.9, 100_000.0, 2)?;
    println!("   Two nearest rooms to (52.0, 4.9):");
    for (_, room) in &nearest {
        println!("     - {}", room.address);
    }
    println!();

    // === DISPLAY COVERINGS ===
    println!("5. Display Coverings");
    println!("--------------------");

    let region = Region::circle(51.9244, 4.4777, 10_000.0);
    let covering = store.display_covering(&region)?;
    println!("   10km disc covered by {} display cells", covering.len());

    let overlay = cells_to_feature_collection(&covering)?;
    println!("   GeoJSON overlay: {} bytes\n", overlay.len());

    // === STORE STATISTICS ===
    println!("6. Store Statistics");
    println!("-------------------");

    let stats = store.stats()?;
    println!("   Buckets: {}", stats.buckets);
    println!("   Rooms: {}", stats.rooms);
    println!("   Cached buckets: {}", stats.cached_buckets);

    println!("\n=== Getting Started Complete! ===");
    println!("\nKey Features Demonstrated:");
    println!("  • Cell-bucketed room storage");
    println!("  • Radius and rectangle queries");
    println!("  • Nearest-first ordering");
    println!("  • Display coverings as GeoJSON");
    println!("  • Store statistics");

    Ok(())
}
