use std::fmt::Write;

use crate::classify::ClassifiedContact;
use crate::models::{Cell, ReportRow, ReportTable};
use crate::vocab::{Faculty, Hub};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    FacultyActivity,
    MembershipBreakdown,
    HubActivity,
    UosActivity,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::FacultyActivity,
        ReportKind::MembershipBreakdown,
        ReportKind::HubActivity,
        ReportKind::UosActivity,
    ];

    /// File-name component.
    pub fn slug(self) -> &'static str {
        match self {
            ReportKind::FacultyActivity => "faculty_activity",
            ReportKind::MembershipBreakdown => "membership_report",
            ReportKind::HubActivity => "activity_per_hub",
            ReportKind::UosActivity => "uos_activity",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::FacultyActivity => "Faculty Activity",
            ReportKind::MembershipBreakdown => "Membership Breakdown",
            ReportKind::HubActivity => "Activity per Hub",
            ReportKind::UosActivity => "UoS vs Non-UoS Activity",
        }
    }

    pub fn build(self, contacts: &[ClassifiedContact]) -> ReportTable {
        match self {
            ReportKind::FacultyActivity => faculty_activity(contacts),
            ReportKind::MembershipBreakdown => membership_breakdown(contacts),
            ReportKind::HubActivity => hub_activity(contacts),
            ReportKind::UosActivity => uos_activity(contacts),
        }
    }
}

/// Members and active members of one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityCount {
    pub total: u64,
    pub active: u64,
}

impl ActivityCount {
    pub fn tally<'a>(contacts: impl IntoIterator<Item = &'a ClassifiedContact>) -> Self {
        let mut count = Self::default();
        for contact in contacts {
            count.total += 1;
            if contact.is_active() {
                count.active += 1;
            }
        }
        count
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.active as f64 / self.total as f64 * 100.0
        }
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

pub fn faculty_activity(contacts: &[ClassifiedContact]) -> ReportTable {
    let rows = Faculty::ALL
        .into_iter()
        .map(|faculty| {
            let count = ActivityCount::tally(contacts.iter().filter(|c| c.in_faculty(faculty)));
            ReportRow::new()
                .with("Faculty", Cell::text(faculty.label()))
                .with("Total Members", Cell::Count(count.total))
                .with("Active Members", Cell::Count(count.active))
                .with("Active %", Cell::Text(format_percent(count.percent())))
        })
        .collect();

    ReportTable {
        slug: ReportKind::FacultyActivity.slug(),
        rows,
    }
}

pub fn hub_activity(contacts: &[ClassifiedContact]) -> ReportTable {
    let rows = Hub::ALL
        .into_iter()
        .map(|hub| {
            let count = ActivityCount::tally(contacts.iter().filter(|c| c.in_hub(hub)));
            ReportRow::new()
                .with("Hub", Cell::text(hub.label()))
                .with("Members", Cell::Count(count.total))
                .with("Active", Cell::Count(count.active))
                .with("Active %", Cell::Text(format_percent(count.percent())))
        })
        .collect();

    ReportTable {
        slug: ReportKind::HubActivity.slug(),
        rows,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Breakdown {
    total: u64,
    non_current: u64,
    current: u64,
    alumni: u64,
    faculties: [u64; Faculty::ALL.len()],
}

impl Breakdown {
    fn add(&mut self, contact: &ClassifiedContact) {
        self.total += 1;
        if contact.is_current {
            self.current += 1;
        } else {
            self.non_current += 1;
        }
        if contact.is_alumni {
            self.alumni += 1;
        }
        for (slot, faculty) in self.faculties.iter_mut().zip(Faculty::ALL) {
            if contact.in_faculty(faculty) {
                *slot += 1;
            }
        }
    }

    fn row(&self, label: &str) -> ReportRow {
        let mut row = ReportRow::new()
            .with("PCE Hub", Cell::text(label))
            .with("Total", Cell::Count(self.total))
            .with("Non-Current UoS", Cell::Count(self.non_current))
            .with("Current UoS", Cell::Count(self.current))
            .with("Alumni", Cell::Count(self.alumni));
        for (count, faculty) in self.faculties.iter().zip(Faculty::ALL) {
            row = row.with(faculty.code(), Cell::Count(*count));
        }
        row
    }
}

/// Per-hub cross-tabulation, led by an "All Hubs" row over every contact.
/// A contact counts toward each hub and each faculty it belongs to.
pub fn membership_breakdown(contacts: &[ClassifiedContact]) -> ReportTable {
    let mut all = Breakdown::default();
    let mut per_hub = [Breakdown::default(); Hub::ALL.len()];

    for contact in contacts {
        all.add(contact);
        for (breakdown, hub) in per_hub.iter_mut().zip(Hub::ALL) {
            if contact.in_hub(hub) {
                breakdown.add(contact);
            }
        }
    }

    let mut rows = vec![all.row("All Hubs")];
    rows.extend(
        per_hub
            .iter()
            .zip(Hub::ALL)
            .map(|(breakdown, hub)| breakdown.row(hub.label())),
    );

    ReportTable {
        slug: ReportKind::MembershipBreakdown.slug(),
        rows,
    }
}

pub fn uos_activity(contacts: &[ClassifiedContact]) -> ReportTable {
    let current = ActivityCount::tally(contacts.iter().filter(|c| c.is_current));
    let other = ActivityCount::tally(contacts.iter().filter(|c| !c.is_current));

    let rows = [("UOS", current), ("Non-UOS", other)]
        .into_iter()
        .map(|(category, count)| {
            ReportRow::new()
                .with("Category", Cell::text(category))
                .with("Members", Cell::Count(count.total))
                .with("Active", Cell::Count(count.active))
                .with("Active %", Cell::Text(format_percent(count.percent())))
        })
        .collect();

    ReportTable {
        slug: ReportKind::UosActivity.slug(),
        rows,
    }
}

/// Fixed-width text rendering for the terminal.
pub fn render_text(title: &str, table: &ReportTable) -> String {
    let columns = table.columns();
    let mut widths: Vec<usize> = columns.iter().map(|name| name.chars().count()).collect();
    for row in &table.rows {
        for (width, (_, cell)) in widths.iter_mut().zip(&row.fields) {
            *width = (*width).max(cell.to_string().chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "## {title}");

    if table.rows.is_empty() {
        let _ = writeln!(output, "No rows.");
        return output;
    }

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(name, width)| format!("{name:<width$}"))
        .collect();
    let _ = writeln!(output, "{}", header.join(" | "));
    let _ = writeln!(
        output,
        "{}",
        "-".repeat(widths.iter().sum::<usize>() + 3 * (widths.len() - 1))
    );

    for row in &table.rows {
        let cells: Vec<String> = row
            .fields
            .iter()
            .zip(&widths)
            .map(|((_, cell), width)| match cell {
                Cell::Text(text) => format!("{text:<width$}"),
                Cell::Count(count) => format!("{count:>width$}"),
            })
            .collect();
        let _ = writeln!(output, "{}", cells.join(" | "));
    }

    output
}
