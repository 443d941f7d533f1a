use geoshape::{BoundingBoxPolicy, GeoCircle, GeoCoordinate, GeoPath, GeoPolygon, GeoShape};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut route = GeoPath::new(vec![
        GeoCoordinate::new(-36.85, 174.76),
        GeoCoordinate::new(-17.71, 178.06),
        GeoCoordinate::new(21.31, -157.86),
    ])
    .with_width(50_000.0)
    .with_policy(BoundingBoxPolicy::Eager);

    route.add_coordinate(GeoCoordinate::new(37.77, -122.42));

    log::info!("Route: {route}");
    log::info!("Route bounds: {}", route.bounding_geo_rectangle());
    log::info!("Route length: {:.0} m", route.length(0, Some(route.size() - 1)));

    let honolulu = GeoCoordinate::new(21.31, -157.86);
    log::info!("Honolulu on route: {}", route.contains(&honolulu));

    let circle = GeoCircle::new(GeoCoordinate::new(85.0, 0.0), 1_000_000.0);
    log::info!(
        "{circle} covers the north pole: {}, bounds: {}",
        circle.crosses_north_pole(),
        circle.bounding_geo_rectangle()
    );

    let polygon = GeoPolygon::from_circle(&circle, 64);
    log::info!(
        "Polygon from circle has {} points and contains the pole: {}",
        polygon.size(),
        polygon.contains(&GeoCoordinate::new(90.0, 0.0))
    );
}
