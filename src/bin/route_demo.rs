use anyhow::Result;
use orthoroute_core::routing::diagnostics::NodeField;
use orthoroute_core::routing::path::turn_count;
use orthoroute_core::{Direction, Point, Rect, RouteRequest, Router};
use std::collections::HashMap;

fn main() -> Result<()> {
    println!("Initializing connector router...");

    let mut router = Router::new().with_name("demo");

    let mut params = HashMap::new();
    params.insert("step".to_string(), 10.0);
    params.insert("inertia".to_string(), 5.0);
    router.configure(&params)?;

    let scenarios = vec![
        (
            "straight",
            RouteRequest::new(
                Point::new(0.0, 0.0),
                Direction::LeftToRight,
                Point::new(100.0, 0.0),
                Direction::LeftToRight,
            ),
        ),
        (
            "around obstacle",
            RouteRequest::new(
                Point::new(0.0, 0.0),
                Direction::LeftToRight,
                Point::new(50.0, 50.0),
                Direction::TopToBottom,
            )
            .with_obstacles([Rect::centered(Point::new(25.0, 25.0), 20.0, 20.0)]),
        ),
        (
            "enclosed endpoints",
            RouteRequest::new(
                Point::new(10.0, 10.0),
                Direction::LeftToRight,
                Point::new(20.0, 20.0),
                Direction::LeftToRight,
            )
            .with_obstacles([Rect::new(0.0, 0.0, 40.0, 40.0)]),
        ),
    ];

    for (name, request) in &scenarios {
        let result = router.search_detailed(request)?;
        println!(
            "{}: {:?} after {} expansions, {} turns",
            name,
            result.outcome,
            result.expansions,
            turn_count(&result.path)
        );
        let vertices: Vec<(f64, f64)> = result.path.iter().map(|p| (p.x, p.y)).collect();
        println!("  path: {:?}", vertices);
    }

    println!("Direction grid of the last routed connector:");
    router.search(&scenarios[1].1)?;
    println!("{}", router.render_last(NodeField::Direction)?);

    Ok(())
}
