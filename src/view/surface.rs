//! Location detail surfaces rendered as plain text.

use crate::models::{Location, VisitRecord};
use crate::photo::strip_html;
use crate::records::group_by_year;
use crate::store::RecordSelection;
use crate::tags::classify_location;

use super::LayoutMode;

/// What a detail surface shows.
#[derive(Debug, Clone, Copy)]
pub struct DetailContext<'a> {
    pub location: &'a Location,
    pub records: &'a [VisitRecord],
    /// Record shown by paged surfaces
    pub cursor: usize,
    pub loading: bool,
}

impl<'a> DetailContext<'a> {
    pub fn new(location: &'a Location, selection: &'a RecordSelection) -> Self {
        Self {
            location,
            records: selection.records(),
            cursor: selection.cursor(),
            loading: selection.is_loading(),
        }
    }
}

/// Renders the details of the selected location.
pub trait DetailSurface {
    fn render(&self, ctx: &DetailContext<'_>) -> String;
}

/// Desktop: full information and every record grouped by year.
pub struct SidePanel;

/// Mobile: compact information and one record at a time.
pub struct BottomCard;

pub fn surface_for(layout: LayoutMode) -> Box<dyn DetailSurface + Send + Sync> {
    match layout {
        LayoutMode::Desktop => Box::new(SidePanel),
        LayoutMode::Mobile => Box::new(BottomCard),
    }
}

fn location_lines(location: &Location, compact: bool) -> Vec<String> {
    let mut lines = vec![format!(
        "{} [{}]",
        location.name,
        classify_location(location)
    )];

    if let Some(address) = location.address.as_deref().filter(|a| !a.is_empty()) {
        lines.push(format!("地址: {}", address));
    }
    if let Some(brief) = location.brief_description.as_deref().filter(|b| !b.is_empty()) {
        lines.push(strip_html(brief));
    }
    if !compact {
        let tags = location.tags();
        if !tags.is_empty() {
            lines.push(format!("標籤: {}", tags.join(", ")));
        }
        if let Some(photo) = location.photo.as_deref().filter(|p| !p.is_empty()) {
            lines.push(format!("照片: {}", photo));
        }
    }
    lines
}

fn record_lines(record: &VisitRecord, indent: &str) -> Vec<String> {
    let mut lines = vec![format!("{}{} ({})", indent, record.date, record.semester)];
    lines.push(format!("{}  {}", indent, strip_html(&record.description)));

    if record.students.is_empty() {
        lines.push(format!("{}  學生: 無學生參與", indent));
    } else {
        lines.push(format!("{}  學生: {}", indent, record.students.join("、")));
    }

    if record.villagers.is_empty() {
        lines.push(format!("{}  村民: 無村民參與", indent));
    } else {
        let names: Vec<&str> = record.villagers.iter().map(|v| v.name.as_str()).collect();
        lines.push(format!("{}  村民: {}", indent, names.join("、")));
    }

    if let Some(photo) = &record.photo {
        lines.push(format!("{}  照片: {}", indent, photo));
    }
    lines
}

impl DetailSurface for SidePanel {
    fn render(&self, ctx: &DetailContext<'_>) -> String {
        let mut lines = location_lines(ctx.location, false);
        lines.push(String::new());
        lines.push("訪視紀錄".to_string());

        if ctx.loading {
            lines.push("載入中…".to_string());
        } else if ctx.records.is_empty() {
            lines.push("尚無訪視紀錄".to_string());
        } else {
            for group in group_by_year(ctx.records) {
                lines.push(format!("[{}] {} 筆", group.year, group.records.len()));
                for record in group.records {
                    lines.extend(record_lines(record, "  "));
                }
            }
        }

        lines.join("\n")
    }
}

impl DetailSurface for BottomCard {
    fn render(&self, ctx: &DetailContext<'_>) -> String {
        let mut lines = location_lines(ctx.location, true);

        if ctx.loading {
            lines.push("載入中…".to_string());
        } else {
            match ctx.records.get(ctx.cursor) {
                Some(record) => {
                    lines.push(format!(
                        "訪視紀錄 {} / {}",
                        ctx.cursor + 1,
                        ctx.records.len()
                    ));
                    lines.extend(record_lines(record, ""));
                }
                None => lines.push("尚無訪視紀錄".to_string()),
            }
        }

        lines.join("\n")
    }
}
