use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    error::AppError,
    ini::IniDocument,
    profile::{Profile, ProfileRepository, Workspace},
};

/// Profile store spread over an ordered list of INI files
///
/// Reads return the first layer defining a workspace. Writes go to the layer
/// already holding the workspace, or to the first (primary) layer.
#[derive(Debug, Clone)]
pub struct IniFileProfileRepository {
    layers: Vec<PathBuf>,
}

/// One loaded layer
struct LayerSource {
    path: PathBuf,
    doc: IniDocument,
}

impl IniFileProfileRepository {
    /// Creates a store over `layers`, highest priority first
    pub fn new(layers: Vec<PathBuf>) -> Result<Self, AppError> {
        if layers.is_empty() {
            return Err(AppError::NoProfileLayers);
        }
        Ok(Self { layers })
    }

    fn primary(&self) -> &Path {
        &self.layers[0]
    }

    /// Loads every existing layer; missing files are skipped
    fn load(&self) -> Result<Vec<LayerSource>, AppError> {
        let mut sources = Vec::with_capacity(self.layers.len());
        for path in &self.layers {
            if !path.is_file() {
                debug!(path = %path.display(), "skipping missing profile file");
                continue;
            }
            sources.push(LayerSource {
                path: path.clone(),
                doc: IniDocument::load(path)?,
            });
        }
        Ok(sources)
    }

    /// Creates the primary file and its parent directories when absent
    fn ensure_primary(&self) -> Result<(), AppError> {
        let primary = self.primary();
        if primary.is_file() {
            return Ok(());
        }
        if primary.exists() {
            return Err(AppError::Io(std::io::Error::other(format!(
                "profile path {} is not a file",
                primary.display()
            ))));
        }

        if let Some(parent) = primary.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(primary, "")?;
        info!(path = %primary.display(), "created profile file");
        Ok(())
    }
}

impl ProfileRepository for IniFileProfileRepository {
    fn get(&self, workspace: &Workspace) -> Result<Profile, AppError> {
        let sources = self.load()?;
        let section = workspace.as_str();

        let source = sources
            .iter()
            .find(|source| source.doc.has_section(section))
            .ok_or_else(|| AppError::ProfileNotFound(section.to_string()))?;

        debug!(workspace = section, path = %source.path.display(), "found profile");
        Profile::new(
            section,
            source.doc.get(section, "email").unwrap_or_default(),
            source.doc.get(section, "name").unwrap_or_default(),
        )
    }

    fn save(&self, profile: &Profile) -> Result<(), AppError> {
        self.ensure_primary()?;

        let mut sources = self.load()?;
        let section = profile.workspace().as_str();
        let index = sources
            .iter()
            .position(|source| source.doc.has_section(section))
            .unwrap_or(0);
        let source = &mut sources[index];

        source.doc.set(section, "name", profile.name().as_str());
        source.doc.set(section, "email", profile.email().as_str());
        source.doc.save(&source.path)?;

        info!(workspace = section, path = %source.path.display(), "saved profile");
        Ok(())
    }

    fn delete(&self, workspace: &Workspace) -> Result<(), AppError> {
        let mut sources = self.load()?;
        let section = workspace.as_str();

        let Some(source) = sources
            .iter_mut()
            .find(|source| source.doc.has_section(section))
        else {
            debug!(workspace = section, "nothing to delete");
            return Ok(());
        };

        source.doc.remove_section(section);
        source.doc.save(&source.path)?;

        info!(workspace = section, path = %source.path.display(), "deleted profile");
        Ok(())
    }

    fn list(&self) -> Result<Vec<Profile>, AppError> {
        let mut profiles = Vec::new();
        for source in self.load()? {
            for section in source.doc.section_names() {
                profiles.push(Profile::new(
                    section,
                    source.doc.get(section, "email").unwrap_or_default(),
                    source.doc.get(section, "name").unwrap_or_default(),
                )?);
            }
        }
        debug!(count = profiles.len(), "listed profiles");
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn profile(workspace: &str, email: &str, name: &str) -> Profile {
        Profile::new(workspace, email, name).unwrap()
    }

    fn workspace(value: &str) -> Workspace {
        Workspace::new(value).unwrap()
    }

    /// Two layers inside a scratch directory, neither created yet
    fn two_layers() -> (TempDir, PathBuf, PathBuf, IniFileProfileRepository) {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("home").join(".gitprofile");
        let second = dir.path().join("project").join(".gitprofile");
        let repo = IniFileProfileRepository::new(vec![first.clone(), second.clone()]).unwrap();
        (dir, first, second, repo)
    }

    #[test]
    fn test_requires_a_layer() {
        assert!(matches!(
            IniFileProfileRepository::new(Vec::new()),
            Err(AppError::NoProfileLayers)
        ));
    }

    #[test]
    fn test_empty_store() {
        let (_dir, _, _, repo) = two_layers();
        assert!(repo.list().unwrap().is_empty());
        assert!(matches!(
            repo.get(&workspace("work")),
            Err(AppError::ProfileNotFound(w)) if w == "work"
        ));
    }

    #[test]
    fn test_save_then_get_round_trips() {
        let (_dir, first, _, repo) = two_layers();
        let work = profile("work", "jane@corp.com", "Jane Doe");

        repo.save(&work).unwrap();

        assert!(first.is_file());
        assert_eq!(repo.get(work.workspace()).unwrap(), work);
        let text = fs::read_to_string(&first).unwrap();
        assert_eq!(text, "[work]\nname = Jane Doe\nemail = jane@corp.com\n");
    }

    #[test]
    fn test_save_updates_existing_section() {
        let (_dir, first, _, repo) = two_layers();
        repo.save(&profile("work", "old@corp.com", "Old")).unwrap();
        repo.save(&profile("work", "new@corp.com", "New")).unwrap();

        assert_eq!(repo.list().unwrap(), vec![profile("work", "new@corp.com", "New")]);
        let text = fs::read_to_string(&first).unwrap();
        assert_eq!(text.matches("[work]").count(), 1);
    }

    #[test]
    fn test_first_layer_wins_reads() {
        let (_dir, first, second, repo) = two_layers();
        fs::create_dir_all(first.parent().unwrap()).unwrap();
        fs::create_dir_all(second.parent().unwrap()).unwrap();
        fs::write(&first, "[work]\nname = Home\nemail = home@corp.com\n").unwrap();
        fs::write(&second, "[work]\nname = Local\nemail = local@corp.com\n").unwrap();

        let found = repo.get(&workspace("work")).unwrap();
        assert_eq!(found.email().as_str(), "home@corp.com");
    }

    #[test]
    fn test_save_edits_the_layer_that_holds_the_workspace() {
        let (_dir, first, second, repo) = two_layers();
        fs::create_dir_all(second.parent().unwrap()).unwrap();
        fs::write(&second, "[oss]\nname = Jane\nemail = jane@oss.org\n").unwrap();

        repo.save(&profile("oss", "jane@new.org", "Jane")).unwrap();
        repo.save(&profile("work", "jane@corp.com", "Jane")).unwrap();

        let second_text = fs::read_to_string(&second).unwrap();
        assert!(second_text.contains("email = jane@new.org"));
        assert!(!second_text.contains("[work]"));

        // primary created on demand and receives new entries
        let first_text = fs::read_to_string(&first).unwrap();
        assert!(first_text.contains("[work]"));
        assert!(!first_text.contains("[oss]"));
    }

    #[test]
    fn test_delete_removes_from_holding_layer_only() {
        let (_dir, first, second, repo) = two_layers();
        fs::create_dir_all(first.parent().unwrap()).unwrap();
        fs::create_dir_all(second.parent().unwrap()).unwrap();
        fs::write(&first, "[home]\nname = Home\nemail = home@me.com\n").unwrap();
        fs::write(
            &second,
            "[oss]\nname = Oss\nemail = oss@me.com\n\n[keep]\nname = Keep\nemail = keep@me.com\n",
        )
        .unwrap();

        repo.delete(&workspace("oss")).unwrap();

        assert!(matches!(repo.get(&workspace("oss")), Err(AppError::ProfileNotFound(_))));
        assert_eq!(repo.get(&workspace("keep")).unwrap().name().as_str(), "Keep");
        assert_eq!(repo.get(&workspace("home")).unwrap().name().as_str(), "Home");
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let (_dir, first, _, repo) = two_layers();
        repo.save(&profile("work", "a@b.com", "A")).unwrap();
        let before = fs::read_to_string(&first).unwrap();

        repo.delete(&workspace("absent")).unwrap();

        assert_eq!(fs::read_to_string(&first).unwrap(), before);
    }

    #[test]
    fn test_list_concatenates_layers_in_order() {
        let (_dir, first, second, repo) = two_layers();
        fs::create_dir_all(first.parent().unwrap()).unwrap();
        fs::create_dir_all(second.parent().unwrap()).unwrap();
        fs::write(
            &first,
            "global = ignored\n[b]\nname = B\nemail = b@x.com\n[a]\nname = A\nemail = a@x.com\n",
        )
        .unwrap();
        fs::write(&second, "[c]\nname = C\nemail = c@x.com\n").unwrap();

        let workspaces: Vec<String> = repo
            .list()
            .unwrap()
            .iter()
            .map(|profile| profile.workspace().to_string())
            .collect();
        assert_eq!(workspaces, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_empty_file_contributes_nothing() {
        let (_dir, first, _, repo) = two_layers();
        fs::create_dir_all(first.parent().unwrap()).unwrap();
        fs::write(&first, "").unwrap();
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let (_dir, first, _, repo) = two_layers();
        fs::create_dir_all(first.parent().unwrap()).unwrap();
        fs::write(&first, "[work\nname = A\n").unwrap();

        assert!(matches!(repo.list(), Err(AppError::MalformedConfig { .. })));
        assert!(matches!(
            repo.get(&workspace("work")),
            Err(AppError::MalformedConfig { .. })
        ));
    }

    #[test]
    fn test_invalid_stored_profile_is_a_validation_error() {
        let (_dir, first, _, repo) = two_layers();
        fs::create_dir_all(first.parent().unwrap()).unwrap();
        fs::write(&first, "[work]\nname = A\nemail = broken\n").unwrap();

        assert!(matches!(repo.get(&workspace("work")), Err(AppError::InvalidEmail)));
        assert!(matches!(repo.list(), Err(AppError::InvalidEmail)));
    }
}
