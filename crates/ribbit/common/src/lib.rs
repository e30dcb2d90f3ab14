#![allow(clippy::must_use_candidate)]

pub mod args;

/// A named contract together with the source file it lives in, when known.
///
/// Foundry writes build artifacts to `out/<source file>/<contract>.json`;
/// when the source file is not given we probe the conventional locations.
#[derive(Clone)]
pub struct Contract {
    file_name: Option<String>,
    contract_name: String,
}

impl Contract {
    const SOURCE_EXTENSION: &'static str = ".sol";

    pub fn new(file_name: Option<String>, contract_name: String) -> Self {
        Self {
            file_name,
            contract_name,
        }
    }

    /// Candidate artifact paths relative to the build output directory,
    /// most specific first.
    pub fn artifact_paths(&self) -> Vec<String> {
        if let Some(file_name) = &self.file_name {
            vec![format!("{file_name}/{}.json", self.contract_name)]
        } else {
            vec![
                format!(
                    "{name}{ext}/{name}.json",
                    name = self.contract_name,
                    ext = Self::SOURCE_EXTENSION
                ),
                format!("{}.json", self.contract_name),
            ]
        }
    }

    pub const fn contract_name(&self) -> &String {
        &self.contract_name
    }
}
