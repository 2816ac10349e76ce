//! Predefined album libraries
//!
//! Small, named libraries covering the interesting shapes an export meets:
//! nesting, titles with separators, broken references and name collisions.
//! Used by unit tests and by the `simulate` command.

use super::mock_store::MockAlbumStore;
use std::fs;
use std::io;
use std::path::Path;

/// A library plus the upload files that back it
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Scenario name for identification
    pub name: &'static str,
    /// What this scenario exercises
    pub description: &'static str,
    pub store: MockAlbumStore,
    /// Files to place under the uploads root: (relative path, content)
    pub uploads: Vec<(&'static str, &'static [u8])>,
}

impl Scenario {
    /// Write the scenario's upload files below `uploads_root`
    pub fn write_uploads(&self, uploads_root: &Path) -> io::Result<()> {
        for (relative, content) in &self.uploads {
            let path = uploads_root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
        }
        Ok(())
    }
}

/// "Trips" containing "Trip/2019" with one photo
pub fn trips() -> Scenario {
    Scenario {
        name: "trips",
        description: "Root album with one nested album holding a single photo",
        store: MockAlbumStore::new()
            .with_album("a-trips", None, Some("Trips"))
            .with_album("a-2019", Some("a-trips"), Some("Trip/2019"))
            .with_photo("p-beach", "a-2019", Some("original/7f/beach.jpg")),
        uploads: vec![("original/7f/beach.jpg", &b"\xFF\xD8\xFF\xE0 beach"[..])],
    }
}

/// "Beach Day" with one valid photo and one without an original variant
pub fn beach_day() -> Scenario {
    Scenario {
        name: "beach_day",
        description: "Album where one photo has no original size variant",
        store: MockAlbumStore::new()
            .with_album("a-beach", None, Some("Beach Day"))
            .with_photo("p-ok", "a-beach", Some("original/01/sand.jpg"))
            .with_photo("p-missing", "a-beach", None),
        uploads: vec![("original/01/sand.jpg", &b"\xFF\xD8\xFF\xE0 sand"[..])],
    }
}

/// Two siblings both titled "Summer Vacation"
pub fn summer_collision() -> Scenario {
    Scenario {
        name: "summer_collision",
        description: "Sibling albums whose titles sanitize to the same directory",
        store: MockAlbumStore::new()
            .with_album("root", None, Some("Holidays"))
            .with_album("s1", Some("root"), Some("Summer Vacation"))
            .with_album("s2", Some("root"), Some("Summer Vacation")),
        uploads: Vec::new(),
    }
}

/// Empty library
pub fn empty() -> Scenario {
    Scenario {
        name: "empty",
        description: "No albums at all",
        store: MockAlbumStore::new(),
        uploads: Vec::new(),
    }
}

/// Several levels of nesting with one photo whose file is gone
pub fn family() -> Scenario {
    Scenario {
        name: "family",
        description: "Nested albums across two roots, one photo file missing from uploads",
        store: MockAlbumStore::new()
            .with_album("f", None, Some("Family"))
            .with_album("f-2020", Some("f"), Some("2020"))
            .with_album("f-2020-xmas", Some("f-2020"), Some("Christmas Eve"))
            .with_album("f-2021", Some("f"), Some("2021"))
            .with_album("w", None, Some("Work / Events"))
            .with_photo("p1", "f", Some("original/aa/portrait.jpg"))
            .with_photo("p2", "f-2020", Some("original/bb/garden.jpg"))
            .with_photo("p3", "f-2020-xmas", Some("original/cc/tree.jpg"))
            .with_photo("p4", "f-2020-xmas", Some("original/cc/gone.jpg"))
            .with_photo("p5", "w", Some("original/dd/stage.jpg")),
        uploads: vec![
            ("original/aa/portrait.jpg", &b"portrait"[..]),
            ("original/bb/garden.jpg", &b"garden"[..]),
            ("original/cc/tree.jpg", &b"tree"[..]),
            ("original/dd/stage.jpg", &b"stage"[..]),
        ],
    }
}

/// All scenarios
pub fn all() -> Vec<Scenario> {
    vec![trips(), beach_day(), summer_collision(), empty(), family()]
}

/// Find a scenario by name
pub fn by_name(name: &str) -> Option<Scenario> {
    all().into_iter().find(|s| s.name == name)
}
