//! Table formatting and output utilities

use crate::service::models::Resource;
use tabled::{
    settings::{object::Rows, Alignment, Color, Modify, Padding, Style},
    Table, Tabled,
};

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Public ID")]
    public_id: String,
    #[tabled(rename = "Version")]
    version: u64,
    #[tabled(rename = "Type")]
    resource_type: String,
    #[tabled(rename = "Size")]
    size: String,
}

/// Convenience function for formatting a table with default settings
pub fn format_table(mut table: Table, no_color: bool) -> String {
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .with(Padding::new(1, 1, 0, 0));

    if !no_color {
        table.with(Modify::new(Rows::first()).with(Color::FG_BLUE));
    }

    table.to_string()
}

/// Render a resource listing as a table
pub fn resources_table(resources: &[Resource], no_color: bool) -> String {
    let rows: Vec<ResourceRow> = resources
        .iter()
        .map(|r| ResourceRow {
            public_id: r.public_id.clone(),
            version: r.version,
            resource_type: r.resource_type.clone(),
            size: format_size(r.bytes),
        })
        .collect();

    format_table(Table::new(&rows), no_color)
}

/// Format file size in human-readable format
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_resources_table_lists_every_resource() {
        let resources = vec![
            Resource {
                public_id: "css/site".to_string(),
                version: 1369431906,
                resource_type: "raw".to_string(),
                bytes: 120,
                url: String::new(),
                secure_url: String::new(),
                format: None,
                created_at: None,
            },
            Resource {
                public_id: "images/logo".to_string(),
                version: 1369431907,
                resource_type: "image".to_string(),
                bytes: 4096,
                url: String::new(),
                secure_url: String::new(),
                format: Some("png".to_string()),
                created_at: None,
            },
        ];

        let output = resources_table(&resources, true);
        assert!(output.contains("Public ID"));
        assert!(output.contains("css/site"));
        assert!(output.contains("images/logo"));
        assert!(output.contains("4.00 KB"));
    }
}
