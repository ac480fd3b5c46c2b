//! Test fixtures for building datasets and payloads.

use resource_finder::Resource;

/// The two-resource directory used by the filter and search scenarios.
pub fn two_resources() -> Vec<Resource> {
    vec![
        Resource::new("A Center")
            .with_geography(["Wake"])
            .with_primary_type(["Device Access"]),
        Resource::new("B Hub")
            .with_geography(["Durham"])
            .with_primary_type(["Digital Skills"]),
    ]
}

/// `count` resources spread across a few counties and categories, named so
/// that name order matches creation order.
pub fn numbered_resources(count: usize) -> Vec<Resource> {
    let counties = ["Wake", "Durham", "Orange"];
    let categories = ["Device Access", "Digital Skills", "Virtual Support"];
    (0..count)
        .map(|i| {
            Resource::new(format!("Resource {i:03}"))
                .with_geography([counties[i % counties.len()]])
                .with_primary_type([categories[i % categories.len()]])
        })
        .collect()
}

pub const SAMPLE_CSV: &str = concat!(
    "name,geography,primary_type,website,description,address_geocode,googlemaps_link,long,lat\n",
    "Wake Tech Library,\"Wake, 27601\",Digital Skills,waketech.edu,Free laptop lending,",
    "\"1 Main St, Raleigh\",,-78.64,35.78\n",
    ",Durham,Device Access,,,,,,\n",
    "Durham Hub,Durham,\"Device Access, Virtual Support\",https://durhamhub.org,",
    "Hotspot lending,,,,\n",
);

pub const SAMPLE_JSON: &str = r#"[
    {
        "name": "Orange Learning Center",
        "geography": ["Orange"],
        "primary_type": "Digital Navigation",
        "long": -79.1,
        "lat": "36.07"
    },
    {
        "Name": "Chapel Hill Device Bank",
        "Geography": "Orange, 27514",
        "Primary_Filter": "Device Access"
    },
    {"geography": "Wake"}
]"#;
