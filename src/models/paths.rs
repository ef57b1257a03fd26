use camino::{Utf8Path, Utf8PathBuf};

macro_rules! define_paths {
    ($name:ident { $($field:ident : $default:expr),* $(,)? }) => {
        #[derive(Clone, Debug)]
        pub struct $name {
            $(pub $field: Utf8PathBuf,)*
        }

        impl $name {
            pub fn to_absolute(mut self, base: &Utf8Path) -> Self {
                $(self.$field = base.join(self.$field);)*
                self
            }

            pub fn new(base: &Utf8Path) -> Self {
                Self::default().to_absolute(base)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $($field: $default.into(),)*
                }
            }
        }
    };
}

// Relative to a steamapps library root.
define_paths!(SteamLibraryPaths {
    common: "common",
});

// Relative to the CrossOver application bundle.
define_paths!(CrossOverPaths {
    wine: "Contents/SharedSupport/CrossOver/bin/wine",
});

// Relative to a single bottle directory.
define_paths!(BottlePaths {
    config: "cxbottle.conf",
});

// Relative to the user's home directory.
define_paths!(BottleRoots {
    crossover: "Library/Application Support/CrossOver/Bottles",
    patched: "CXPBottles",
});

/// Name of the vendor manifest files found at the top of a library root.
pub const MANIFEST_EXTENSION: &str = "acf";

/// Windows executables mark a title that needs the compatibility layer.
pub const NON_NATIVE_EXTENSION: &str = "exe";

/// Steam client path inside a bottle's C: drive, as seen by wine.
pub const BOTTLE_STEAM_EXE: &str = r"C:\Program Files (x86)\Steam\Steam.exe";
