use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use fs2::FileExt;

use crate::models::{GroceryList, Item, ItemState, LIST_FILE, ListCounts};

/// Atomically write content to a file using a temporary file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let temp = path.with_extension("toml.tmp");
    let mut file = File::create(&temp)
        .with_context(|| format!("Failed to create temporary file: {}", temp.display()))?;
    file.lock_exclusive()
        .context("Failed to acquire file lock")?;
    file.write_all(content)
        .context("Failed to write file content")?;
    file.sync_all().context("Failed to sync file")?;
    file.unlock().context("Failed to unlock file")?;
    fs::rename(&temp, path).with_context(|| format!("Failed to rename to {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}

/// In-memory view of the `.pantry/` directory: one subdirectory per list,
/// holding `list.toml` and one `<item_id>.toml` per item.
pub struct Database {
    path: PathBuf,
    lists: HashMap<String, GroceryList>,
    items: HashMap<String, Item>,
}

impl Database {
    /// Open an existing database from the given directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            bail!("Database directory does not exist: {}", path.display());
        }

        let mut db = Self {
            path,
            lists: HashMap::new(),
            items: HashMap::new(),
        };

        db.load()?;
        tracing::debug!(
            lists = db.lists.len(),
            items = db.items.len(),
            "loaded database"
        );
        Ok(db)
    }

    fn load(&mut self) -> Result<()> {
        let dir = fs::read_dir(&self.path).context("Failed to read .pantry directory")?;

        for entry in dir {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_dir() {
                continue;
            }

            let list_path = path.join(LIST_FILE);
            if !list_path.exists() {
                continue;
            }

            let list_content = fs::read_to_string(&list_path)
                .with_context(|| format!("Failed to read {}", list_path.display()))?;
            let list: GroceryList = toml::from_str(&list_content)
                .with_context(|| format!("Failed to parse {}", list_path.display()))?;

            self.lists.insert(list.id.clone(), list);

            let item_dir = fs::read_dir(&path)
                .with_context(|| format!("Failed to read list directory: {}", path.display()))?;

            for item_entry in item_dir {
                let item_entry = item_entry.context("Failed to read item entry")?;
                let item_path = item_entry.path();

                if item_path.file_name() == Some(std::ffi::OsStr::new(LIST_FILE)) {
                    continue;
                }

                if item_path.extension() != Some(std::ffi::OsStr::new("toml")) {
                    continue;
                }

                let item_content = fs::read_to_string(&item_path)
                    .with_context(|| format!("Failed to read {}", item_path.display()))?;
                let item: Item = toml::from_str(&item_content)
                    .with_context(|| format!("Failed to parse {}", item_path.display()))?;

                self.items.insert(item.id.clone(), item);
            }
        }

        Ok(())
    }

    // List operations

    pub fn create_list(&mut self, list: GroceryList) -> Result<()> {
        if self.lists.contains_key(&list.id) {
            bail!("List already exists: {}", list.id);
        }

        fs::create_dir_all(list.dir(&self.path)).context("Failed to create list directory")?;

        list.write_file(&self.path)?;
        self.lists.insert(list.id.clone(), list);

        Ok(())
    }

    pub fn get_list(&self, id: &str) -> Option<&GroceryList> {
        self.lists.get(id)
    }

    /// Persist a list that is already known to the database.
    pub fn update_list(&mut self, list: GroceryList) -> Result<()> {
        if !self.lists.contains_key(&list.id) {
            bail!("List not found: {}", list.id);
        }

        list.write_file(&self.path)?;
        self.lists.insert(list.id.clone(), list);
        Ok(())
    }

    /// All lists, newest first.
    pub fn list_lists(&self) -> Vec<&GroceryList> {
        let mut lists: Vec<&GroceryList> = self.lists.values().collect();
        lists.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        lists
    }

    pub fn list_ids(&self) -> Vec<&str> {
        self.list_lists().into_iter().map(|l| l.id.as_str()).collect()
    }

    // Item operations

    pub fn create_item(&mut self, item: Item) -> Result<()> {
        if self.items.contains_key(&item.id) {
            bail!("Item already exists: {}", item.id);
        }
        if !self.lists.contains_key(&item.list_id) {
            bail!("List not found: {}", item.list_id);
        }

        item.write_file(&self.path)?;
        self.items.insert(item.id.clone(), item);

        Ok(())
    }

    pub fn get_item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Persist an item that is already known to the database.
    pub fn update_item(&mut self, item: Item) -> Result<()> {
        if !self.items.contains_key(&item.id) {
            bail!("Item not found: {}", item.id);
        }

        item.write_file(&self.path)?;
        self.items.insert(item.id.clone(), item);
        Ok(())
    }

    /// Items of one list in the order they were added.
    pub fn list_items(&self, list_id: &str) -> Vec<&Item> {
        let mut items: Vec<&Item> = self
            .items
            .values()
            .filter(|i| i.list_id == list_id)
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        items
    }

    /// Items across every list: lists oldest first, items in insertion order.
    pub fn all_items(&self) -> Vec<&Item> {
        self.list_lists()
            .into_iter()
            .rev()
            .flat_map(|list| self.list_items(&list.id))
            .collect()
    }

    pub fn item_ids(&self) -> Vec<&str> {
        self.all_items().into_iter().map(|i| i.id.as_str()).collect()
    }

    pub fn compute_list_counts(&self, list_id: &str) -> ListCounts {
        let items = self.list_items(list_id);
        let count = |state: ItemState| items.iter().filter(|i| i.state == state).count();

        ListCounts {
            item_count: items.len(),
            needed: count(ItemState::Needed),
            bought: count(ItemState::Bought),
            skipped: count(ItemState::Skipped),
        }
    }
}
