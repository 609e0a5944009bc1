//! Spreadsheet <-> store reconciliation.
//!
//! `sync_votes` pushes vote counts into the sheet, aligned to the nominee
//! names already listed there. The join is by name: renamed or misspelled
//! rows silently get 0, and two nominees sharing a name collapse into one
//! (last one read wins).
//!
//! `import_nominees` goes the other way and seeds categories and nominees from
//! the sheet. It never touches an existing nominee, so re-running it cannot
//! reset votes.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::config::SheetLayout;
use crate::error::AppError;
use crate::models::{
    category::{category_slug, Category},
    nominee::Nominee,
};
use crate::services::{sheets::SheetClient, store::StoreHandle};

#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq, Eq)]
pub struct SyncReport {
    /// Nominees read from the store.
    pub nominees: usize,
    /// Rows written to the votes column.
    pub rows: usize,
    /// Rows whose name matched a nominee.
    pub matched: usize,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub categories: usize,
    pub nominees_created: usize,
    pub nominees_existing: usize,
    pub skipped: usize,
}

#[derive(Debug, PartialEq)]
pub struct PlannedNominee {
    pub category_id: String,
    pub name: String,
    pub image_url: String,
}

#[derive(Debug, Default, PartialEq)]
pub struct ImportPlan {
    pub categories: Vec<Category>,
    pub nominees: Vec<PlannedNominee>,
    pub skipped: usize,
}

pub struct SheetSyncService {
    store: StoreHandle,
    sheets: Option<Arc<dyn SheetClient>>,
    layout: SheetLayout,
}

impl SheetSyncService {
    pub fn new(store: StoreHandle, sheets: Option<Arc<dyn SheetClient>>, layout: SheetLayout) -> Self {
        Self { store, sheets, layout }
    }

    fn sheets(&self) -> Result<&dyn SheetClient, AppError> {
        self.sheets
            .as_deref()
            .ok_or_else(|| AppError::Config("spreadsheet access is not configured".to_string()))
    }

    pub async fn sync_votes(&self) -> Result<SyncReport, AppError> {
        let store = self.store.get()?;
        let sheets = self.sheets()?;
        info!("starting sheet vote sync");

        let mut nominees = Vec::new();
        for category in store.list_categories().await? {
            nominees.extend(store.list_nominees(&category.id).await?);
        }
        info!(count = nominees.len(), "fetched nominees from store");

        let tally = tally_by_name(&nominees);

        let names_range = self.layout.names_range();
        let names: Vec<String> = sheets
            .read_range(&names_range)
            .await?
            .into_iter()
            .map(|row| row.into_iter().next().unwrap_or_default())
            .collect();
        info!(count = names.len(), range = %names_range, "read nominee names from sheet");

        let (column, matched) = align_votes(&names, &tally);
        sheets.write_column(&self.layout.votes_range(), &column).await?;

        info!(rows = column.len(), matched, "sheet votes column updated");
        Ok(SyncReport {
            nominees: nominees.len(),
            rows: column.len(),
            matched,
        })
    }

    pub async fn import_nominees(&self) -> Result<ImportReport, AppError> {
        let store = self.store.get()?;
        let sheets = self.sheets()?;

        let rows = sheets.read_range(&self.layout.import_range()).await?;
        let plan = plan_import(&rows)?;
        info!(
            categories = plan.categories.len(),
            nominees = plan.nominees.len(),
            skipped = plan.skipped,
            "import plan built"
        );

        for category in &plan.categories {
            store.upsert_category(category).await?;
        }

        let mut created = 0;
        for nominee in &plan.nominees {
            if store
                .insert_nominee_if_absent(&nominee.category_id, &nominee.name, &nominee.image_url)
                .await?
            {
                created += 1;
            }
        }

        Ok(ImportReport {
            categories: plan.categories.len(),
            nominees_created: created,
            nominees_existing: plan.nominees.len() - created,
            skipped: plan.skipped,
        })
    }
}

/// name -> votes; a later nominee with the same name replaces the earlier one.
pub fn tally_by_name(nominees: &[Nominee]) -> HashMap<String, i64> {
    let mut tally = HashMap::with_capacity(nominees.len());
    for nominee in nominees {
        if let Some(previous) = tally.insert(nominee.name.clone(), nominee.votes) {
            warn!(
                name = %nominee.name,
                previous,
                replacement = nominee.votes,
                "duplicate nominee name, keeping the last count"
            );
        }
    }
    tally
}

/// One count per sheet row, in sheet order; unknown or blank names get 0.
/// Also returns how many rows matched a nominee.
pub fn align_votes(names: &[String], tally: &HashMap<String, i64>) -> (Vec<i64>, usize) {
    let mut matched = 0;
    let column = names
        .iter()
        .map(|name| match tally.get(name) {
            Some(votes) => {
                matched += 1;
                *votes
            }
            None => 0,
        })
        .collect();
    (column, matched)
}

struct ImportColumns {
    category: Option<usize>,
    nominee: usize,
    description: Option<usize>,
    order: Option<usize>,
    image_url: Option<usize>,
}

impl ImportColumns {
    fn from_header(header: &[String]) -> Result<Self, AppError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let nominee = find("Nominees").ok_or_else(|| {
            AppError::Validation("Sheet header has no 'Nominees' column.".to_string())
        })?;

        Ok(Self {
            category: find("Categories"),
            nominee,
            description: find("Description"),
            order: find("order"),
            image_url: find("imageUrl"),
        })
    }
}

fn cell(row: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|i| row.get(i))
        .map(|s| s.trim())
        .unwrap_or_default()
}

/// Walks sheet rows (header first). A row with a category title opens a new
/// category that following rows inherit until the next title.
pub fn plan_import(rows: &[Vec<String>]) -> Result<ImportPlan, AppError> {
    let Some((header, data)) = rows.split_first() else {
        return Ok(ImportPlan::default());
    };
    let columns = ImportColumns::from_header(header)?;

    let mut plan = ImportPlan::default();
    let mut current: Option<String> = None;

    for row in data {
        let nominee_name = cell(row, Some(columns.nominee));
        if nominee_name.is_empty() {
            plan.skipped += 1;
            continue;
        }

        let title = cell(row, columns.category);
        if !title.is_empty() {
            let id = category_slug(title);
            if !plan.categories.iter().any(|c| c.id == id) {
                plan.categories.push(Category {
                    id: id.clone(),
                    title: title.to_string(),
                    order: cell(row, columns.order).parse().unwrap_or(0),
                    description: cell(row, columns.description).to_string(),
                    icon_url: None,
                });
            }
            current = Some(id);
        }

        match &current {
            Some(category_id) => plan.nominees.push(PlannedNominee {
                category_id: category_id.clone(),
                name: nominee_name.to_string(),
                image_url: cell(row, columns.image_url).to_string(),
            }),
            None => {
                warn!(nominee = nominee_name, "skipping nominee listed before any category");
                plan.skipped += 1;
            }
        }
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominee(name: &str, votes: i64) -> Nominee {
        Nominee {
            id: name.to_lowercase(),
            category_id: "cat".to_string(),
            name: name.to_string(),
            image_url: String::new(),
            votes,
        }
    }

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn missing_names_default_to_zero() {
        let tally = tally_by_name(&[nominee("A", 5), nominee("B", 0)]);
        let names = vec!["A".to_string(), "B".to_string(), "C".to_string()];

        let (column, matched) = align_votes(&names, &tally);
        assert_eq!(column, vec![5, 0, 0]);
        assert_eq!(matched, 2);
    }

    #[test]
    fn blank_rows_keep_alignment() {
        let tally = tally_by_name(&[nominee("A", 5), nominee("C", 12)]);
        let names = vec!["A".to_string(), String::new(), "C".to_string()];

        let (column, _) = align_votes(&names, &tally);
        assert_eq!(column, vec![5, 0, 12]);
    }

    #[test]
    fn duplicate_names_last_write_wins() {
        let tally = tally_by_name(&[nominee("A", 5), nominee("A", 9)]);
        assert_eq!(tally.get("A"), Some(&9));
    }

    #[test]
    fn import_carries_category_forward() {
        let sheet = rows(&[
            &["order", "Categories", "Description", "Nominees", "imageUrl"],
            &["1", "Best Athlete", "Top performer", "Abebe", "a.png"],
            &["", "", "", "Tirunesh", "t.png"],
            &["", "", "", "", ""],
            &["2", "Podcast/Show", "Audio", "Kick Off", ""],
        ]);

        let plan = plan_import(&sheet).unwrap();
        assert_eq!(plan.skipped, 1);
        assert_eq!(plan.categories.len(), 2);
        assert_eq!(plan.categories[0].id, "best-athlete");
        assert_eq!(plan.categories[0].order, 1);
        assert_eq!(plan.categories[1].id, "podcast-show");
        assert_eq!(
            plan.nominees[1],
            PlannedNominee {
                category_id: "best-athlete".to_string(),
                name: "Tirunesh".to_string(),
                image_url: "t.png".to_string(),
            }
        );
        assert_eq!(plan.nominees[2].category_id, "podcast-show");
    }

    #[test]
    fn import_skips_nominees_before_first_category() {
        let sheet = rows(&[
            &["Categories", "Nominees"],
            &["", "Orphan"],
            &["Rising Star", "Newcomer"],
        ]);
        let plan = plan_import(&sheet).unwrap();
        assert_eq!(plan.skipped, 1);
        assert_eq!(plan.nominees.len(), 1);
    }

    #[test]
    fn import_requires_nominee_header() {
        let sheet = rows(&[&["Categories", "Names"], &["X", "Y"]]);
        assert!(matches!(plan_import(&sheet), Err(AppError::Validation(_))));
    }

    #[test]
    fn unparsable_order_defaults_to_zero() {
        let sheet = rows(&[&["Categories", "Nominees", "order"], &["X", "Y", "first"]]);
        assert_eq!(plan_import(&sheet).unwrap().categories[0].order, 0);
    }
}
