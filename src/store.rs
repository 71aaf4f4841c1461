//! Persistent project catalog and device settings.
//!
//! The catalog holds the user's projects (id, name, ring color) plus the
//! two persisted settings the session core needs: the default focus
//! duration and the last-used project index. Everything lives in an
//! in-memory cache with a dirty flag; under the `embedded` feature the
//! cache syncs to the RP2040's flash via the `sequential-storage` crate.
//!
//! Storage layout:
//!   - The whole catalog is one map item: a count-prefixed run of
//!     variable-length project records followed by a settings trailer.
//!   - `sequential-storage` handles wear levelling and GC over the
//!     reserved flash pages.

use crate::config::{
    DEFAULT_TIMER_MIN, MAX_PROJECTS, PROJECT_ID_LEN, PROJECT_NAME_LEN,
};
use crate::error::Error;
use heapless::{String, Vec};

/// Maximum serialized size of the catalog image.
/// 16 projects × (1 + 16 id + 1 + 24 name + 3 color) + 1 count + 3 trailer.
pub const MAX_IMAGE_SIZE: usize = 768;

/// Key for the catalog image in the map storage.
#[cfg(feature = "embedded")]
const KEY_CATALOG: u8 = 0x01;

/// Encoding of "no last-used project" in the settings trailer.
const NO_INDEX: u8 = 0xFF;

/// Parse a `#RRGGBB` color string as used by the project API.
pub fn parse_hex_color(s: &str) -> Result<u32, Error> {
    let hex = s.strip_prefix('#').ok_or(Error::InvalidColor)?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidColor);
    }
    u32::from_str_radix(hex, 16).map_err(|_| Error::InvalidColor)
}

/// A project the user can book focus time against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Project {
    /// Device-local project id, handed to the webhook layer.
    pub id: String<PROJECT_ID_LEN>,
    /// Display name (truncated to fit).
    pub name: String<PROJECT_NAME_LEN>,
    /// Ring color, `0xRRGGBB`.
    pub color: u32,
}

impl Project {
    /// Create a project record, truncating id/name to capacity.
    pub fn new(id: &str, name: &str, color: u32) -> Self {
        let mut i: String<PROJECT_ID_LEN> = String::new();
        for c in id.chars().take(PROJECT_ID_LEN) {
            let _ = i.push(c);
        }
        let mut n: String<PROJECT_NAME_LEN> = String::new();
        for c in name.chars().take(PROJECT_NAME_LEN) {
            let _ = n.push(c);
        }
        Self {
            id: i,
            name: n,
            color,
        }
    }

    /// Serialize to bytes for the flash image.
    /// Format: [1 id_len][id][1 name_len][name][3 color]
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, Error> {
        let id = self.id.as_bytes();
        let name = self.name.as_bytes();
        let total = 1 + id.len() + 1 + name.len() + 3;
        if buf.len() < total {
            return Err(Error::BufferOverflow);
        }

        buf[0] = id.len() as u8;
        buf[1..1 + id.len()].copy_from_slice(id);
        let mut at = 1 + id.len();
        buf[at] = name.len() as u8;
        at += 1;
        buf[at..at + name.len()].copy_from_slice(name);
        at += name.len();
        buf[at] = (self.color >> 16) as u8;
        buf[at + 1] = (self.color >> 8) as u8;
        buf[at + 2] = self.color as u8;
        Ok(total)
    }

    /// Deserialize one record; returns the project and its encoded length.
    fn deserialize(data: &[u8]) -> Result<(Self, usize), Error> {
        let id_len = *data.first().ok_or(Error::InvalidRecord)? as usize;
        if id_len > PROJECT_ID_LEN || data.len() < 1 + id_len + 1 {
            return Err(Error::InvalidRecord);
        }
        let id = core::str::from_utf8(&data[1..1 + id_len]).map_err(|_| Error::InvalidRecord)?;

        let mut at = 1 + id_len;
        let name_len = data[at] as usize;
        at += 1;
        if name_len > PROJECT_NAME_LEN || data.len() < at + name_len + 3 {
            return Err(Error::InvalidRecord);
        }
        let name =
            core::str::from_utf8(&data[at..at + name_len]).map_err(|_| Error::InvalidRecord)?;
        at += name_len;

        let color = (u32::from(data[at]) << 16) | (u32::from(data[at + 1]) << 8)
            | u32::from(data[at + 2]);
        Ok((Self::new(id, name, color), at + 3))
    }
}

/// In-memory cache of projects and settings, synced with flash.
pub struct ProjectCatalog {
    projects: Vec<Project, MAX_PROJECTS>,
    /// Default focus duration in minutes; 0 is the indeterminate mode.
    default_timer_min: u16,
    /// Catalog index of the last project booked against, if any.
    last_index: Option<usize>,
    /// Dirty flag - true if cache differs from flash.
    dirty: bool,
}

impl ProjectCatalog {
    pub const fn new() -> Self {
        Self {
            projects: Vec::new(),
            default_timer_min: DEFAULT_TIMER_MIN,
            last_index: None,
            dirty: false,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Add or update a project (matched by id).
    pub fn add(&mut self, project: Project) -> Result<(), Error> {
        if let Some(existing) = self.projects.iter_mut().find(|p| p.id == project.id) {
            *existing = project;
            self.dirty = true;
            return Ok(());
        }
        self.projects.push(project).map_err(|_| Error::CatalogFull)?;
        self.dirty = true;
        Ok(())
    }

    /// Remove a project by id; the last-used index is dropped since it
    /// may no longer point at the same project.
    pub fn remove_by_id(&mut self, id: &str) -> bool {
        let Some(pos) = self.projects.iter().position(|p| p.id == id) else {
            return false;
        };
        self.projects.remove(pos);
        self.last_index = None;
        self.dirty = true;
        true
    }

    pub fn project_by_id(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn default_timer_min(&self) -> u16 {
        self.default_timer_min
    }

    pub fn set_default_timer_min(&mut self, minutes: u16) {
        if self.default_timer_min != minutes {
            self.default_timer_min = minutes;
            self.dirty = true;
        }
    }

    pub fn last_index(&self) -> Option<usize> {
        self.last_index
    }

    pub fn set_last_index(&mut self, index: Option<usize>) {
        if self.last_index != index {
            self.last_index = index;
            self.dirty = true;
        }
    }

    /// Factory reset: drop all projects and restore default settings.
    pub fn wipe(&mut self) {
        self.projects.clear();
        self.default_timer_min = DEFAULT_TIMER_MIN;
        self.last_index = None;
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Serialize the whole catalog + settings to one flash image.
    pub fn serialize_image(&self, buf: &mut [u8]) -> Result<usize, Error> {
        if buf.is_empty() {
            return Err(Error::BufferOverflow);
        }
        buf[0] = self.projects.len() as u8;
        let mut at = 1;
        for project in &self.projects {
            at += project.serialize(&mut buf[at..])?;
        }
        if buf.len() < at + 3 {
            return Err(Error::BufferOverflow);
        }
        buf[at] = self.default_timer_min as u8;
        buf[at + 1] = (self.default_timer_min >> 8) as u8;
        buf[at + 2] = match self.last_index {
            Some(i) if i < MAX_PROJECTS => i as u8,
            _ => NO_INDEX,
        };
        Ok(at + 3)
    }

    /// Replace the cache with a stored image. On a malformed image the
    /// cache is reset to defaults and the error reported; the caller
    /// carries on with an empty catalog rather than failing startup.
    pub fn load_image(&mut self, data: &[u8]) -> Result<(), Error> {
        self.projects.clear();
        self.default_timer_min = DEFAULT_TIMER_MIN;
        self.last_index = None;
        self.dirty = false;

        let inner = |cat: &mut Self| -> Result<(), Error> {
            let count = *data.first().ok_or(Error::InvalidRecord)? as usize;
            let mut at = 1;
            for _ in 0..count {
                let (project, len) = Project::deserialize(&data[at..])?;
                at += len;
                if cat.projects.push(project).is_err() {
                    return Err(Error::InvalidRecord);
                }
            }
            if data.len() < at + 3 {
                return Err(Error::InvalidRecord);
            }
            cat.default_timer_min = u16::from(data[at]) | (u16::from(data[at + 1]) << 8);
            cat.last_index = match data[at + 2] {
                NO_INDEX => None,
                i if (i as usize) < cat.projects.len() => Some(i as usize),
                _ => None,
            };
            Ok(())
        };

        inner(self).inspect_err(|_| self.wipe())
    }

    /// Async load from flash using sequential-storage.
    #[cfg(feature = "embedded")]
    pub async fn load_from_flash(
        &mut self,
        flash: &mut impl embedded_storage_async::nor_flash::NorFlash,
    ) {
        use defmt::{error, info};

        let mut buf = [0u8; MAX_IMAGE_SIZE];
        match sequential_storage::map::fetch_item::<u8, &[u8], _>(
            flash,
            flash_range(),
            &mut sequential_storage::cache::NoCache::new(),
            &mut buf,
            &KEY_CATALOG,
        )
        .await
        {
            Ok(Some(data)) => match self.load_image(data) {
                Ok(()) => info!("Loaded {} projects from flash", self.projects.len()),
                Err(e) => error!("Corrupt catalog image, starting empty: {:?}", e),
            },
            Ok(None) => {
                info!("No catalog in flash");
            }
            Err(e) => {
                error!("Flash read error: {:?}", defmt::Debug2Format(&e));
            }
        }
    }

    /// Persist the catalog to flash if it changed.
    #[cfg(feature = "embedded")]
    pub async fn save_to_flash(
        &mut self,
        flash: &mut impl embedded_storage_async::nor_flash::NorFlash,
    ) {
        use defmt::{debug, error, info};

        if !self.dirty {
            debug!("Catalog: no changes to save");
            return;
        }

        let mut buf = [0u8; MAX_IMAGE_SIZE];
        let mut data_buf = [0u8; MAX_IMAGE_SIZE];
        let len = match self.serialize_image(&mut data_buf) {
            Ok(len) => len,
            Err(e) => {
                error!("Catalog serialize failed: {:?}", e);
                return;
            }
        };
        let item = &data_buf[..len];

        match sequential_storage::map::store_item::<u8, &[u8], _>(
            flash,
            flash_range(),
            &mut sequential_storage::cache::NoCache::new(),
            &mut buf,
            &KEY_CATALOG,
            &item,
        )
        .await
        {
            Ok(_) => {
                info!("Saved {} projects to flash", self.projects.len());
                self.dirty = false;
            }
            Err(e) => {
                error!("Flash write error: {:?}", defmt::Debug2Format(&e));
            }
        }
    }
}

impl Default for ProjectCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embedded")]
fn flash_range() -> core::ops::Range<u32> {
    use crate::config::{STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START};

    /// Flash sector size on the Pico W (4 KB).
    const FLASH_PAGE_SIZE: u32 = 4096;

    let start = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;
    start..start + STORAGE_FLASH_PAGE_COUNT * FLASH_PAGE_SIZE
}
