use std::path::Path;

use anyhow::Result;
use console::{Term, style};
use serde::Serialize;

use crate::commands::item::{AddResult, TransitionResult};
use crate::commands::list::ListOverview;
use crate::commands::matches::MatchResult;
use crate::commands::status::{ListStatus, StatusResult};
use crate::commands::summary::{ItemGroup, Summary};
use crate::models::{GroceryList, Item, ListCounts, ListState, Note};

const NOTE_WIDTH: usize = 72;

pub struct Output {
    term: Term,
    json: bool,
    concise: bool,
    verbose: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self {
            term: Term::stdout(),
            json,
            concise: false,
            verbose: false,
        }
    }

    pub fn with_concise(json: bool, concise: bool) -> Self {
        Self {
            term: Term::stdout(),
            json,
            concise,
            verbose: false,
        }
    }

    pub fn with_verbose(json: bool, verbose: bool) -> Self {
        Self {
            term: Term::stdout(),
            json,
            concise: false,
            verbose,
        }
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let output = serde_json::to_string_pretty(value)?;
        self.term.write_line(&output)?;
        Ok(())
    }

    fn print_counts(&self, counts: &ListCounts) -> Result<()> {
        self.term.write_line(&format!(
            "  Items: {} total, {} needed, {} bought, {} skipped",
            counts.item_count, counts.needed, counts.bought, counts.skipped
        ))?;
        Ok(())
    }

    fn print_notes(&self, notes: &[Note], indent: &str) -> Result<()> {
        for note in notes {
            self.term.write_line(&format!(
                "{indent}[{}]",
                style(&note.created_at).dim()
            ))?;
            let wrapped = textwrap::fill(&note.text, NOTE_WIDTH);
            self.term
                .write_line(&textwrap::indent(&wrapped, &format!("{indent}  ")))?;
        }
        Ok(())
    }

    pub fn list_created(&self, list: &GroceryList) -> Result<()> {
        if self.json {
            return self.print_json(list);
        }

        self.term.write_line(&format!(
            "{} {}",
            style("Created list:").green(),
            style(&list.id).cyan().bold()
        ))?;
        self.term.write_line(&format!("  Name: {}", list.name))?;
        Ok(())
    }

    pub fn list_overview(&self, lists: &[ListOverview]) -> Result<()> {
        if self.json {
            return self.print_json(lists);
        }

        if lists.is_empty() {
            self.term.write_line("No lists found.")?;
            return Ok(());
        }

        for overview in lists {
            let list = &overview.list;
            self.term.write_line(&format!(
                "{} [{}]",
                style(&list.id).cyan().bold(),
                style(list.state.as_ref()).yellow()
            ))?;
            self.term.write_line(&format!("  Name: {}", list.name))?;
            self.print_counts(&overview.counts)?;
            self.term.write_line("")?;
        }
        Ok(())
    }

    pub fn item_added(&self, result: &AddResult) -> Result<()> {
        if self.json {
            return self.print_json(result);
        }

        let item = &result.item;
        self.term.write_line(&format!(
            "{} {}",
            style("Added item:").green(),
            style(&item.id).cyan().bold()
        ))?;
        self.term
            .write_line(&format!("  {} ({})", item.name, item.amount()))?;

        if let Some(similar) = &result.similar {
            self.term.write_line(&format!(
                "  {} {} ({}) [{}]",
                style("Similar item already on list:").yellow(),
                similar.name,
                style(&similar.id).cyan(),
                similar.state.as_ref()
            ))?;
        }
        if result.list_reopened {
            self.term
                .write_line(&format!("  List {} reopened", style(&item.list_id).cyan()))?;
        }
        Ok(())
    }

    pub fn item_list(&self, items: &[Item], list: &GroceryList) -> Result<()> {
        if self.json {
            return self.print_json(items);
        }

        self.term.write_line(&format!(
            "Items on list: {} [{}]",
            style(&list.id).cyan().bold(),
            style(list.state.as_ref()).yellow()
        ))?;
        self.term.write_line(&format!("  {}", list.name))?;
        self.term.write_line("")?;

        if items.is_empty() {
            self.term.write_line("No items found.")?;
            return Ok(());
        }

        for item in items {
            self.print_item_summary(item)?;
            if self.verbose && !item.notes.is_empty() {
                self.term
                    .write_line(&format!("  Notes: ({})", item.notes.len()))?;
                self.print_notes(&item.notes, "    ")?;
            }
        }
        Ok(())
    }

    fn print_item_summary(&self, item: &Item) -> Result<()> {
        let category = item
            .category
            .as_deref()
            .map(|c| format!(" {}", style(format!("#{c}")).dim()))
            .unwrap_or_default();

        self.term.write_line(&format!(
            "{} [{}] {} ({}){category}",
            style(&item.id).cyan().bold(),
            style(item.state.as_ref()).yellow(),
            item.name,
            item.amount()
        ))?;
        Ok(())
    }

    pub fn item_transitioned(&self, label: &str, result: &TransitionResult) -> Result<()> {
        if self.json {
            return self.print_json(result);
        }

        let item = &result.item;
        self.term.write_line(&format!(
            "{} {}",
            style(label).green(),
            style(&item.id).cyan().bold()
        ))?;
        self.term
            .write_line(&format!("  {} ({})", item.name, item.amount()))?;

        match result.list_state {
            Some(ListState::Completed) => {
                self.term.write_line("")?;
                self.term.write_line(&format!(
                    "{} {}",
                    style("List complete:").yellow(),
                    style(&item.list_id).cyan()
                ))?;
            }
            Some(ListState::Open) => {
                self.term
                    .write_line(&format!("  List {} reopened", style(&item.list_id).cyan()))?;
            }
            None => {}
        }
        Ok(())
    }

    pub fn item_noted(&self, item: &Item) -> Result<()> {
        if self.json {
            return self.print_json(item);
        }

        self.term.write_line(&format!(
            "{} {}",
            style("Added note to item:").green(),
            style(&item.id).cyan().bold()
        ))?;
        if let Some(note) = item.notes.last() {
            self.term.write_line(&format!("  Note: {}", note.text))?;
        }
        self.term
            .write_line(&format!("  Total notes: {}", item.notes.len()))?;
        Ok(())
    }

    pub fn status(&self, result: &StatusResult) -> Result<()> {
        match result {
            StatusResult::Item(item) => self.status_item(item),
            StatusResult::List(list_status) => self.status_list(list_status),
            StatusResult::AllLists(lists) => {
                if !self.json && !lists.is_empty() {
                    self.term
                        .write_line(&style("All Lists:").bold().to_string())?;
                    self.term.write_line("")?;
                }
                self.list_overview(lists)
            }
        }
    }

    fn status_item(&self, item: &Item) -> Result<()> {
        if self.json {
            return self.print_json(item);
        }

        self.term.write_line(&format!(
            "Item: {} [{}]",
            style(&item.id).cyan().bold(),
            style(item.state.as_ref()).yellow()
        ))?;
        self.term.write_line(&format!("  List: {}", item.list_id))?;
        self.term.write_line(&format!("  Name: {}", item.name))?;
        self.term
            .write_line(&format!("  Quantity: {}", item.amount()))?;
        if let Some(category) = &item.category {
            self.term.write_line(&format!("  Category: {category}"))?;
        }
        self.term
            .write_line(&format!("  Created: {}", item.created_at))?;
        self.term
            .write_line(&format!("  Updated: {}", item.updated_at))?;
        if let Some(bought_at) = &item.bought_at {
            self.term.write_line(&format!("  Bought: {bought_at}"))?;
        }

        if !self.concise && !item.notes.is_empty() {
            self.term.write_line("")?;
            self.term.write_line(&style("Notes:").bold().to_string())?;
            self.print_notes(&item.notes, "  ")?;
        }

        Ok(())
    }

    fn status_list(&self, list_status: &ListStatus) -> Result<()> {
        if self.json {
            return self.print_json(list_status);
        }

        let list = &list_status.list;

        self.term.write_line(&format!(
            "List: {} [{}]",
            style(&list.id).cyan().bold(),
            style(list.state.as_ref()).yellow()
        ))?;
        self.term.write_line(&format!("  Name: {}", list.name))?;
        self.term
            .write_line(&format!("  Created: {}", list.created_at))?;
        self.term
            .write_line(&format!("  Updated: {}", list.updated_at))?;
        if let Some(completed_at) = &list.completed_at {
            self.term
                .write_line(&format!("  Completed: {completed_at}"))?;
        }
        self.print_counts(&list_status.counts)?;

        if !list_status.items.is_empty() {
            self.term.write_line("")?;
            self.term.write_line(&style("Items:").bold().to_string())?;
            for item in &list_status.items {
                self.term.write_line(&format!(
                    "  {} [{}] - {} ({})",
                    style(&item.id).cyan(),
                    style(item.state.as_ref()).yellow(),
                    item.name,
                    item.amount()
                ))?;
            }
        }
        Ok(())
    }

    pub fn summary(&self, summary: &Summary) -> Result<()> {
        if self.json {
            return self.print_json(summary);
        }

        let scope = summary
            .list_id
            .as_deref()
            .map_or_else(|| "all lists".to_string(), |id| format!("list {id}"));
        self.term.write_line(&format!(
            "{} {} (by {})",
            style("Summary of").bold(),
            scope,
            summary.group_by.as_ref()
        ))?;
        self.term.write_line("")?;

        if summary.groups.is_empty() {
            self.term.write_line("No items found.")?;
            return Ok(());
        }

        for group in &summary.groups {
            self.print_group(group)?;
        }
        Ok(())
    }

    fn print_group(&self, group: &ItemGroup) -> Result<()> {
        self.term
            .write_line(&style(&group.key).cyan().bold().to_string())?;
        self.term.write_line(&format!(
            "  Items: {} ({} needed, {} bought, {} skipped)",
            group.count, group.needed, group.bought, group.skipped
        ))?;

        let quantities: Vec<String> = group
            .quantities
            .iter()
            .map(|q| format!("{} {}", q.total, q.unit).trim_end().to_string())
            .collect();
        self.term
            .write_line(&format!("  Quantity: {}", quantities.join(", ")))?;
        self.term.write_line("")?;
        Ok(())
    }

    pub fn matches(&self, result: &MatchResult) -> Result<()> {
        if self.json {
            return self.print_json(result);
        }

        if result.matches.is_empty() {
            self.term
                .write_line(&format!("No matches for \"{}\".", result.term))?;
            return Ok(());
        }

        self.term.write_line(&format!(
            "Closest matches for \"{}\":",
            style(&result.term).bold()
        ))?;
        for (rank, m) in result.matches.iter().enumerate() {
            self.term.write_line(&format!(
                "  {}. {} {} {}",
                rank + 1,
                style(&m.id).cyan().bold(),
                m.name,
                style(format!("(distance {})", m.distance)).dim()
            ))?;
        }
        Ok(())
    }

    pub fn exported(&self, rows: usize, path: &Path) -> Result<()> {
        self.term.write_line(&format!(
            "{} {} item(s) to {}",
            style("Exported").green(),
            rows,
            path.display()
        ))?;
        Ok(())
    }
}
