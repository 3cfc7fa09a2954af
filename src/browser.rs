//! Browser state: the current listing, its selection, and what commands do to them.
//!
//! The host UI owns a [`Browser`], feeds it [`Command`]s and gestures, and acts
//! on the returned [`Outcome`].

use tracing::{debug, info};

use crate::commands::{Command, CommandReceiver};
use crate::listing::{unique_entries, Entry, Listing};
use crate::selection::gesture::{self, ClickModifiers, ClickSettings};
use crate::selection::SelectionModel;
use crate::share::{ShareRequestBuilder, ShareSettings};

/// What the host UI should do after a command or gesture.
#[derive(Debug, Clone, Default)]
pub enum Outcome {
    /// Nothing to do.
    #[default]
    None,
    /// Open an entry (navigate into a directory or preview a file).
    Open(String),
    /// Show the share dialog for this freshly initialized request.
    OpenShare(Box<ShareRequestBuilder>),
    /// Download these paths.
    Download(Vec<String>),
    /// Open the image gallery at this entry name.
    OpenGallery(String),
}

/// Current directory, its selection, and the settings they are interpreted with.
#[derive(Debug, Clone, Default)]
pub struct Browser {
    listing: Listing,
    selection: SelectionModel,
    share_settings: ShareSettings,
    click_settings: ClickSettings,
}

impl Browser {
    /// Create a browser rooted at `base_path`, showing an empty `/`.
    pub fn new(base_path: impl Into<String>, share_settings: ShareSettings) -> Self {
        Self {
            listing: Listing::new(base_path, "/", Vec::new()),
            selection: SelectionModel::new(0),
            share_settings,
            click_settings: ClickSettings::default(),
        }
    }

    /// Use these click preferences.
    pub fn with_click_settings(mut self, click_settings: ClickSettings) -> Self {
        self.click_settings = click_settings;
        self
    }

    /// Replace the listing with a new directory. The selection is cleared.
    pub fn navigate(&mut self, path: impl Into<String>, entries: Vec<Entry>) {
        self.listing.current_path = path.into();
        self.listing.entries = unique_entries(entries);
        self.selection.reset(self.listing.len());
        info!(
            path = %self.listing.current_path,
            entries = self.listing.len(),
            "Navigated"
        );
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    /// Mutable access for direct gestures (checkboxes, drags).
    pub fn selection_mut(&mut self) -> &mut SelectionModel {
        &mut self.selection
    }

    /// Selected entries in listing order.
    pub fn selected_entries(&self) -> Vec<&Entry> {
        self.selection.selected_entries(&self.listing.entries)
    }

    /// Full paths of the selected entries in listing order.
    pub fn selected_paths(&self) -> Vec<String> {
        self.selected_entries()
            .iter()
            .map(|e| self.listing.full_path(&e.name))
            .collect()
    }

    /// A share builder initialized for the current selection.
    pub fn share_builder(&self) -> ShareRequestBuilder {
        let mut builder = ShareRequestBuilder::new(self.share_settings.clone());
        builder.initialize(
            &self.selected_entries(),
            &self.listing.base_path,
            &self.listing.current_path,
        );
        builder
    }

    /// Apply one command.
    pub fn apply(&mut self, command: Command) -> Outcome {
        debug!(?command, "Applying command");
        match command {
            Command::Share => self.open_share(),
            Command::ShareEntry { index } => {
                if index >= self.listing.len() {
                    return Outcome::None;
                }
                self.selection.toggle(index, true, true);
                self.open_share()
            }
            Command::Download { index } => match self.listing.get(index) {
                Some(entry) => {
                    let path = self.listing.full_path(&entry.name);
                    self.selection.toggle(index, true, true);
                    Outcome::Download(vec![path])
                }
                None => Outcome::None,
            },
            Command::Gallery { name } => match self.listing.position(&name) {
                Some(_) => Outcome::OpenGallery(name),
                None => Outcome::None,
            },
            Command::SelectAll => {
                self.selection.select_all();
                Outcome::None
            }
            Command::ClearSelection => {
                self.selection.clear();
                Outcome::None
            }
            Command::Navigate { path, entries } => {
                self.navigate(path, entries);
                Outcome::None
            }
        }
    }

    /// Apply every pending command from `receiver`, in send order.
    pub fn process(&mut self, receiver: &CommandReceiver) -> Vec<Outcome> {
        receiver
            .drain()
            .into_iter()
            .map(|command| self.apply(command))
            .collect()
    }

    /// Single click on a row.
    pub fn click(&mut self, index: usize, modifiers: ClickModifiers) -> Outcome {
        let intent = gesture::row_click(modifiers, self.click_settings);
        self.apply_intent(intent, index)
    }

    /// Double click on a row.
    pub fn double_click(&mut self, index: usize) -> Outcome {
        let intent = gesture::row_double_click(self.click_settings);
        self.apply_intent(intent, index)
    }

    /// Click on a row's icon.
    pub fn icon_click(&mut self, index: usize, modifiers: ClickModifiers) -> Outcome {
        let Some(entry) = self.listing.get(index) else {
            return Outcome::None;
        };
        match gesture::icon_click(modifiers, entry.is_image()) {
            gesture::ClickIntent::OpenGallery => Outcome::OpenGallery(entry.name.clone()),
            _ => Outcome::None,
        }
    }

    /// Right click on a row: select it alone before the context menu shows.
    pub fn context_menu(&mut self, index: usize) {
        self.selection.toggle(index, true, true);
    }

    fn apply_intent(&mut self, intent: gesture::ClickIntent, index: usize) -> Outcome {
        let Some(name) = self.listing.get(index).map(|e| e.name.clone()) else {
            return Outcome::None;
        };
        if intent.apply(&mut self.selection, index) {
            Outcome::Open(self.listing.full_path(&name))
        } else {
            Outcome::None
        }
    }

    fn open_share(&self) -> Outcome {
        if self.selection.is_empty() {
            debug!("Share requested with nothing selected");
            return Outcome::None;
        }
        Outcome::OpenShare(Box::new(self.share_builder()))
    }
}
