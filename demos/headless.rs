//! Drives both pages against in-memory forms, without a browser.
//!
//! Run with `RUST_LOG=debug` to see the controllers' decisions.

use ridemap::{
    init_logging, DriverMapConfig, DriverMapController, FixedGeolocator, InputEvent, LatLng,
    MemoryPage, RideList, RiderMapConfig, RiderMapController,
};

const RIDES: &str = r#"[
    {"_id": "64f1c0", "pickup": "-1.2833, 36.8167", "destination": "Westlands", "rider_id": "r1"},
    {"_id": "64f1c1", "pickup": "Yaya Centre", "destination": "-1.3000, 36.7800", "rider_id": "r2"},
    {"_id": "64f1c2", "pickup": "-1.2200,36.8900", "destination": "-1.2600, 36.8000", "rider_id": "r3"}
]"#;

fn main() -> ridemap::Result<()> {
    init_logging();

    let rider_page = MemoryPage::new()
        .with_container("map")
        .with_input("pickup")
        .with_input("destination");
    if let Some(mut rider) = RiderMapController::init(rider_page, RiderMapConfig::default()) {
        rider.on_map_click(LatLng::new(-1.2864, 36.8172));
        // A pixel click right of the map center
        rider.handle_input(InputEvent::click(600.0, 300.0))?;

        println!("rider state: {:?}", rider.state());
        println!("  pickup      = {:?}", rider.page().value("pickup"));
        println!("  destination = {:?}", rider.page().value("destination"));
    }

    let driver_page = MemoryPage::new()
        .with_container("driver-map")
        .with_input("driver-current-location");
    let rides = RideList::from_json(RIDES);
    if let Some(mut driver) =
        DriverMapController::init(driver_page, rides, DriverMapConfig::default())
    {
        let device = FixedGeolocator(LatLng::new(-1.2921, 36.8219));
        futures::executor::block_on(driver.start(&device))?;

        let viewport = driver.map().viewport();
        println!("driver map: {} markers", driver.map().markers().len());
        println!("  ride markers = {:?}", driver.ride_marker_ids());
        println!("  view         = {:?} @ zoom {}", viewport.center, viewport.zoom);
        println!(
            "  location     = {:?}",
            driver.page().value("driver-current-location")
        );
    }

    Ok(())
}
