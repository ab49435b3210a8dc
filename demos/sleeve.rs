//! Print the drawing commands of a sleeve insert plus its box as JSON.

use tuckbox::{BuildRequest, InsideKind, PageLayout, Recorder, build_with};

fn main() -> miette::Result<()> {
    let request = BuildRequest {
        inside: InsideKind::Sleeve,
        title: "Sleeved".to_string(),
        ..BuildRequest::new(64.0, 89.0, 13.0)
    };
    let templates = build_with(Recorder::default(), &request)?;

    if let Some(PageLayout::Sleeve(sleeve)) = templates.insert() {
        let bb = sleeve.bounds();
        eprintln!("sleeve net: {} x {}", bb.width(), bb.height());
    }
    println!("{}", templates.canvas().to_json()?);
    Ok(())
}
