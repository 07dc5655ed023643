use ev_api_types::AssetListing;

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|tag| (*tag).to_owned()).collect()
}

/// Sample listings shown on a device that has never stored a catalog.
pub fn seed_listings(now_ms: u64) -> Vec<AssetListing> {
    vec![
        AssetListing {
            id: "1".to_owned(),
            name: "Cybernetic Horizon".to_owned(),
            description: "A professional architectural rendering of a futuristic cityscape under neon rain."
                .to_owned(),
            image_url: "https://picsum.photos/seed/cyber/800/1000".to_owned(),
            price: 450.0,
            seller: "0x3A2...fE1".to_owned(),
            created_at: now_ms.saturating_sub(100_000),
            tags: tags(&["Cyberpunk", "Cityscape", "Professional"]),
        },
        AssetListing {
            id: "2".to_owned(),
            name: "Obsidian Core".to_owned(),
            description: "Minimalist macro photography of raw obsidian fractures. High contrast, professional lighting."
                .to_owned(),
            image_url: "https://picsum.photos/seed/obsidian/800/1000".to_owned(),
            price: 1200.0,
            seller: "0x7B1...aD4".to_owned(),
            created_at: now_ms.saturating_sub(200_000),
            tags: tags(&["Macro", "Minimalist", "Black&White"]),
        },
        AssetListing {
            id: "3".to_owned(),
            name: "Liquid Mercury Abstract".to_owned(),
            description: "3D generated fluid simulation with reflective metallic shaders.".to_owned(),
            image_url: "https://picsum.photos/seed/mercury/800/1000".to_owned(),
            price: 850.0,
            seller: "0x1C2...9E2".to_owned(),
            created_at: now_ms.saturating_sub(300_000),
            tags: tags(&["Abstract", "3D", "Metallic"]),
        },
    ]
}
