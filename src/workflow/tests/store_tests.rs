//! Tests for the store adapters and the shared version rule.

use crate::workflow::{
    adapters::{JsonFileProjectStore, memory::InMemoryProjectStore},
    domain::{Project, ProjectCollection, ProjectDraft, ProjectId, TaskDraft},
    ports::{ProjectStore, StoreError, check_next_version},
};
use camino::Utf8PathBuf;
use eyre::ensure;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use tempfile::TempDir;

fn project(id: &str, titles: &[&str]) -> eyre::Result<Project> {
    let tasks = titles
        .iter()
        .map(|title| TaskDraft::new(*title, format!("Work on {title}")))
        .collect::<Result<Vec<_>, _>>()?;
    let draft = ProjectDraft::new("prompt", tasks)?;
    Ok(Project::new(ProjectId::new(id), draft, &DefaultClock))
}

fn next_snapshot(
    store: &impl ProjectStore,
    projects: Vec<Project>,
) -> eyre::Result<ProjectCollection> {
    let mut collection = store.load()?;
    for item in projects {
        collection.insert(item)?;
    }
    collection.advance_version()?;
    Ok(collection)
}

struct TempStore {
    _dir: TempDir,
    store: JsonFileProjectStore,
}

#[fixture]
fn temp_store() -> eyre::Result<TempStore> {
    let dir = tempfile::tempdir()?;
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .map_err(|path| eyre::eyre!("non UTF-8 temp dir: {}", path.display()))?;
    let store = JsonFileProjectStore::new(root.join("state").join("projects.json"));
    Ok(TempStore { _dir: dir, store })
}

#[rstest]
#[case(0, 1, true)]
#[case(4, 5, true)]
#[case(1, 1, false)]
#[case(1, 3, false)]
#[case(2, 1, false)]
#[case(u64::MAX, 0, false)]
fn next_version_must_be_exactly_one_ahead(
    #[case] stored: u64,
    #[case] attempted: u64,
    #[case] accepted: bool,
) {
    assert_eq!(check_next_version(stored, attempted).is_ok(), accepted);
}

#[rstest]
fn empty_store_loads_an_empty_collection() -> eyre::Result<()> {
    let store = InMemoryProjectStore::new();
    let loaded = store.load()?;
    ensure!(loaded.is_empty());
    ensure!(loaded.version() == 0);
    Ok(())
}

#[rstest]
fn save_replaces_the_snapshot_and_clones_share_it() -> eyre::Result<()> {
    let store = InMemoryProjectStore::new();
    let observer = store.clone();
    let collection = next_snapshot(&store, vec![project("proj-1", &["A"])?])?;

    store.save(&collection)?;

    ensure!(observer.load()? == collection);
    Ok(())
}

#[rstest]
fn saving_a_loaded_collection_is_a_no_op() -> eyre::Result<()> {
    let store = InMemoryProjectStore::new();
    let first = next_snapshot(&store, vec![project("proj-1", &["A"])?])?;
    store.save(&first)?;

    let loaded = store.load()?;
    store.save(&loaded)?;

    ensure!(store.load()? == first);
    ensure!(store.load()?.version() == 1);
    Ok(())
}

#[rstest]
fn save_rejects_a_collection_breaking_invariants() -> eyre::Result<()> {
    let duplicate = project("proj-1", &["A"])?;
    let broken = ProjectCollection::from_parts(1, vec![duplicate.clone(), duplicate]);
    let store = InMemoryProjectStore::new();

    let result = store.save(&broken);

    ensure!(matches!(result, Err(StoreError::Malformed(_))));
    ensure!(store.load()?.is_empty());
    Ok(())
}

#[rstest]
fn json_store_loads_empty_when_nothing_was_saved(
    temp_store: eyre::Result<TempStore>,
) -> eyre::Result<()> {
    let fixture = temp_store?;
    let loaded = fixture.store.load()?;
    ensure!(loaded == ProjectCollection::new());
    ensure!(!fixture.store.path().exists());
    Ok(())
}

#[rstest]
fn json_store_round_trips_in_order(temp_store: eyre::Result<TempStore>) -> eyre::Result<()> {
    let fixture = temp_store?;
    let first = next_snapshot(
        &fixture.store,
        vec![project("proj-b", &["B1", "B2"])?, project("proj-a", &["A1"])?],
    )?;

    fixture.store.save(&first)?;
    let loaded = fixture.store.load()?;

    ensure!(loaded == first);
    let ids: Vec<&str> = loaded
        .projects()
        .iter()
        .map(|item| item.id().as_str())
        .collect();
    ensure!(ids == ["proj-b", "proj-a"]);

    let second = next_snapshot(&fixture.store, vec![project("proj-c", &["C1"])?])?;
    fixture.store.save(&second)?;
    ensure!(fixture.store.load()?.version() == 2);
    ensure!(fixture.store.load()?.len() == 3);
    Ok(())
}

#[rstest]
fn json_store_saving_a_loaded_collection_writes_nothing(
    temp_store: eyre::Result<TempStore>,
) -> eyre::Result<()> {
    let fixture = temp_store?;
    let first = next_snapshot(&fixture.store, vec![project("proj-1", &["A", "B"])?])?;
    fixture.store.save(&first)?;
    let before = std::fs::read(fixture.store.path())?;

    let loaded = fixture.store.load()?;
    fixture.store.save(&loaded)?;

    ensure!(std::fs::read(fixture.store.path())? == before);
    ensure!(fixture.store.load()? == first);
    Ok(())
}

#[rstest]
fn json_store_saving_an_empty_load_creates_no_file(
    temp_store: eyre::Result<TempStore>,
) -> eyre::Result<()> {
    let fixture = temp_store?;
    let loaded = fixture.store.load()?;

    fixture.store.save(&loaded)?;

    ensure!(!fixture.store.path().exists());
    Ok(())
}

#[rstest]
fn json_store_rejects_stale_writes(temp_store: eyre::Result<TempStore>) -> eyre::Result<()> {
    let fixture = temp_store?;
    let seed = next_snapshot(&fixture.store, vec![project("proj-1", &["A"])?])?;
    fixture.store.save(&seed)?;
    let mut stale = fixture.store.load()?;
    let winner = next_snapshot(&fixture.store, vec![project("proj-2", &["B"])?])?;
    fixture.store.save(&winner)?;

    stale.insert(project("proj-3", &["C"])?)?;
    stale.advance_version()?;
    let result = fixture.store.save(&stale);

    ensure!(matches!(
        result,
        Err(StoreError::Conflict {
            stored: 2,
            attempted: 2
        })
    ));
    ensure!(fixture.store.load()? == winner);
    Ok(())
}

#[rstest]
#[case("{ not json")]
#[case("{\"version\": 1, \"projects\": 3}")]
fn json_store_reports_malformed_files(
    temp_store: eyre::Result<TempStore>,
    #[case] contents: &str,
) -> eyre::Result<()> {
    let fixture = temp_store?;
    let path = fixture.store.path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;

    ensure!(matches!(fixture.store.load(), Err(StoreError::Malformed(_))));
    Ok(())
}

#[rstest]
fn json_store_treats_a_blank_file_as_empty(
    temp_store: eyre::Result<TempStore>,
) -> eyre::Result<()> {
    let fixture = temp_store?;
    let path = fixture.store.path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, "  \n")?;

    ensure!(fixture.store.load()?.is_empty());
    Ok(())
}

#[rstest]
fn seeded_store_accepts_only_the_next_version() -> eyre::Result<()> {
    let seeded = ProjectCollection::from_parts(3, vec![project("proj-1", &["A"])?]);
    let store = InMemoryProjectStore::with_collection(seeded.clone());
    ensure!(store.load()? == seeded);

    let next = next_snapshot(&store, vec![project("proj-2", &["B"])?])?;
    ensure!(next.version() == 4);
    store.save(&next)?;
    ensure!(store.load()?.len() == 2);
    Ok(())
}
