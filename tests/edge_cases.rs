use geocluster::{
    BoundingBox, ClusterError, ClusterIndex, Config, IndexOptions, Point, Region, Viewport,
    ViewportController, VisibleItem, zoom_for_region, zoom_level_of,
};

fn total(items: &[VisibleItem]) -> u32 {
    items.iter().map(VisibleItem::point_count).sum()
}

/// Test 1: Large dataset stress test
#[test]
fn test_large_dataset_build_and_query() {
    let points: Vec<Point> = (0..10_000)
        .map(|i| {
            let lon = -74.0 + (i % 100) as f64 * 0.01;
            let lat = 40.0 + (i / 100) as f64 * 0.01;
            Point::new(format!("p{}", i), lon, lat, format!("data{}", i))
        })
        .collect();

    let index = ClusterIndex::build(&points, &IndexOptions::default());
    assert_eq!(index.len(), 10_000);

    let items = index.query(&BoundingBox::world(), 0);
    assert_eq!(total(&items), 10_000);
    assert!(items.len() < 10);

    let close = index.query(&BoundingBox::new(-74.0, 40.0, -73.9, 40.1), 16);
    assert!(!close.is_empty());
    assert!(close.iter().all(|item| !item.is_cluster()));
}

/// Test 2: Extreme coordinate values
#[test]
fn test_extreme_coordinates() {
    let points = vec![
        Point::new("north-pole", 0.0, 90.0, ""),
        Point::new("south-pole", 0.0, -90.0, ""),
        Point::new("date-line-east", 180.0, 0.0, ""),
        Point::new("date-line-west", -180.0, 0.0, ""),
        Point::new("null-island", 0.0, 0.0, ""),
    ];

    let index = ClusterIndex::build(&points, &IndexOptions::default());
    assert!(index.rejected().is_empty());
    for zoom in [0, 5, 11] {
        assert_eq!(total(&index.query(&BoundingBox::world(), zoom)), 5);
    }
}

/// Test 3: Invalid coordinates are reported, the rest still clusters
#[test]
fn test_invalid_coordinates_are_rejected() {
    let points = vec![
        Point::new("ok", 10.0, 10.0, ""),
        Point::new("lon", 181.0, 10.0, ""),
        Point::new("lat", 10.0, -91.0, ""),
        Point::new("nan", f64::NAN, 10.0, ""),
        Point::new("inf", 10.0, f64::NEG_INFINITY, ""),
    ];

    let index = ClusterIndex::build(&points, &IndexOptions::default());
    assert_eq!(index.len(), 1);

    let rejected: Vec<&str> = index.rejected().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(rejected, vec!["lon", "lat", "nan", "inf"]);
    assert!(
        index
            .rejected()
            .iter()
            .all(|r| matches!(r.error, ClusterError::InvalidCoordinate { .. }))
    );
}

/// Test 4: Empty point set is a normal state
#[test]
fn test_empty_point_set() {
    let index = ClusterIndex::build(&[], &IndexOptions::default());
    assert!(index.is_empty());
    assert!(index.query(&BoundingBox::world(), 0).is_empty());

    let mut controller = ViewportController::new(Config::default()).unwrap();
    let items = controller
        .initial_visible_set(Region::new(0.0, 0.0, 10.0, 10.0), Vec::new())
        .unwrap();
    assert!(items.is_empty());
}

/// Test 5: Degenerate regions and boxes
#[test]
fn test_degenerate_region() {
    let mut controller = ViewportController::new(Config::default()).unwrap();
    for region in [
        Region::new(0.0, 0.0, 0.0, 1.0),
        Region::new(0.0, 0.0, 1.0, -1.0),
        Region::new(f64::NAN, 0.0, 1.0, 1.0),
    ] {
        assert!(matches!(
            controller.initial_visible_set(region, Vec::new()),
            Err(ClusterError::DegenerateRegion(_))
        ));
        assert!(matches!(
            controller.on_region_change(region),
            Err(ClusterError::DegenerateRegion(_))
        ));
    }
    assert!(controller.current_region().is_none());

    let flat = BoundingBox::new(10.0, 5.0, 10.0, 6.0);
    assert!(matches!(
        zoom_level_of(&flat, Viewport::new(100, 100)),
        Err(ClusterError::DegenerateRegion(_))
    ));
}

/// Test 6: Zero-sized viewport
#[test]
fn test_empty_viewport() {
    let region = Region::new(0.0, 0.0, 1.0, 1.0);
    assert!(matches!(
        zoom_for_region(&region, Viewport::new(0, 600)),
        Err(ClusterError::InvalidViewport { .. })
    ));
}

/// Test 7: Viewport straddling the antimeridian
#[test]
fn test_antimeridian_region() {
    let points = vec![
        Point::new("fiji", 179.5, -17.0, ""),
        Point::new("samoa", -179.5, -14.0, ""),
        Point::new("far", 20.0, -15.0, ""),
    ];
    let mut controller = ViewportController::new(Config::default()).unwrap();
    let items = controller
        .initial_visible_set(Region::new(180.0, -15.0, 4.0, 8.0), points)
        .unwrap();

    assert_eq!(total(&items), 2);
    assert!(items.iter().all(|item| item.longitude().abs() > 170.0));
}

/// Test 8: Very small regions clamp to the deepest supported zoom
#[test]
fn test_tiny_region_clamps_zoom() {
    let region = Region::new(-74.0, 40.0, 1e-9, 1e-9);
    assert_eq!(zoom_for_region(&region, Viewport::new(390, 844)).unwrap(), 20);

    let index = ClusterIndex::build(
        &[Point::new("a", -74.0, 40.0, ""), Point::new("b", -74.0, 40.0, "")],
        &IndexOptions::default(),
    );
    // Duplicates never separate, even above the last clustered zoom.
    let items = index.query(&BoundingBox::new(-74.1, 39.9, -73.9, 40.1), 20);
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| !item.is_cluster()));
}

/// Test 9: Ids are free-form and may repeat
#[test]
fn test_duplicate_ids() {
    let points = vec![
        Point::new("same", 0.0, 0.0, "first"),
        Point::new("same", 90.0, 0.0, "second"),
    ];
    let index = ClusterIndex::build(&points, &IndexOptions::default());
    let items = index.query(&BoundingBox::world(), 11);
    assert_eq!(items.len(), 2);
    let payloads: Vec<&[u8]> = items
        .iter()
        .filter_map(VisibleItem::as_point)
        .map(|p| p.payload.as_ref())
        .collect();
    assert!(payloads.contains(&b"first".as_slice()));
    assert!(payloads.contains(&b"second".as_slice()));
}
