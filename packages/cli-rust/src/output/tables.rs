//! Tabular listings of clusters and buckets

use comfy_table::{Cell, Color, Table};
use nsai_core::{Bucket, ClusterSummary};

/// Numbered cluster table; `current` is highlighted
pub fn cluster_table(clusters: &[ClusterSummary], current: Option<&str>) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Name", "Cloud", "Region", "Bucket", "Role"]);
    for (i, cluster) in clusters.iter().enumerate() {
        let mut name = Cell::new(&cluster.id);
        if current == Some(cluster.id.as_str()) {
            name = name.fg(Color::Green);
        }
        table.add_row(vec![
            Cell::new(i + 1),
            name,
            Cell::new(cluster.cloud_provider.label()),
            Cell::new(&cluster.region),
            Cell::new(or_dash(&cluster.bucket)),
            Cell::new(or_dash(&cluster.role)),
        ]);
    }
    table
}

/// Numbered bucket table
pub fn bucket_table(buckets: &[Bucket]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Name", "Cloud", "Region", "Size", "Created"]);
    for (i, bucket) in buckets.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&bucket.name),
            Cell::new(bucket.provider.label()),
            Cell::new(or_dash(&bucket.region)),
            Cell::new(or_dash(&bucket.size)),
            Cell::new(or_dash(&bucket.created_at)),
        ]);
    }
    table
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
