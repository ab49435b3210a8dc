//! Render a standard poker-deck tuckbox to `box.svg`.
//!
//! Run with: RUST_LOG=debug cargo run --example box --features tracing

use tracing_subscriber::EnvFilter;
use tuckbox::{BuildRequest, Rgb, TitleFaces, build};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let request = BuildRequest {
        fill: Rgb::parse_lenient("#f7f1e3"),
        title: "Poker".to_string(),
        title_faces: TitleFaces::AllFaces,
        ..BuildRequest::new(63.5, 88.9, 16.0)
    };
    let templates = build(&request)?;
    templates.persist("box.svg")?;
    println!("{:?}", templates.dimensions());
    Ok(())
}
