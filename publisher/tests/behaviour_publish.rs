//! Behaviour-driven tests for appcast and cask publishing runs.
//!
//! Collaborators are in-memory stubs so scenarios run without network
//! access. Tests use the rstest-bdd v0.5.0 mutable world pattern.

use std::cell::RefCell;
use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{TimeZone, Utc};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tapcast::ProjectConfig;
use tapcast_common::{
    Asset, Channel, FetchError, ParsedVersion, PayloadFetcher, ReleaseRecord, Signer,
};
use tapcast_publisher::error::PublisherError;
use tapcast_publisher::github::{ListingError, ReleaseSource};
use tapcast_publisher::naming::{Arch, AssetName};
use tapcast_publisher::pipeline::{
    AppcastOptions, CaskOptions, Collaborators, Report, RunOutcome, generate_appcasts,
    load_signer, update_casks,
};

const APP: &str = "Dockter";

/// Base64 of an all-zero Ed25519 seed.
const ZERO_SEED: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

// ---------------------------------------------------------------------------
// Collaborator stubs
// ---------------------------------------------------------------------------

struct StubReleases(Vec<ReleaseRecord>);

impl ReleaseSource for StubReleases {
    fn list_releases(&self, _repo: &str) -> Result<Vec<ReleaseRecord>, ListingError> {
        Ok(self.0.clone())
    }
}

#[derive(Default)]
struct CountingFetcher {
    downloads: RefCell<HashMap<String, usize>>,
}

impl PayloadFetcher for CountingFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        *self
            .downloads
            .borrow_mut()
            .entry(location.to_owned())
            .or_default() += 1;
        Ok(location.as_bytes().to_vec())
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

struct PublishWorld {
    _temp: tempfile::TempDir,
    root: Utf8PathBuf,
    config: ProjectConfig,
    records: Vec<ReleaseRecord>,
    signer: Option<Signer>,
    fetcher: CountingFetcher,
    outcome: Option<Result<RunOutcome, PublisherError>>,
}

impl PublishWorld {
    fn feeds(&self) -> Utf8PathBuf {
        self.root.join("appcasts")
    }

    fn tap(&self) -> Utf8PathBuf {
        self.root.join("tap")
    }

    fn changelog(&self) -> Utf8PathBuf {
        self.root.join("CHANGELOG.md")
    }

    fn reports(&self) -> &[Report] {
        match self.outcome.as_ref().expect("run attempted") {
            Ok(RunOutcome::Completed { reports }) => reports,
            Ok(RunOutcome::NoReleases) => panic!("expected releases"),
            Err(err) => panic!("run failed: {err}"),
        }
    }
}

#[fixture]
fn world() -> PublishWorld {
    let temp = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path");
    let config = ProjectConfig::from_toml_str(
        "repo = \"apotenza92/dockter\"\napp_name = \"Dockter\"\n\n[cask]\nbundle_id = \"pzc.Dockter\"\n",
    )
    .expect("valid configuration");
    PublishWorld {
        _temp: temp,
        root,
        config,
        records: Vec::new(),
        signer: None,
        fetcher: CountingFetcher::default(),
        outcome: None,
    }
}

fn record(tag: &str, prerelease: bool, arches: &[Arch]) -> ReleaseRecord {
    let version = ParsedVersion::parse(tag).expect("release tag").to_string();
    let channel = if prerelease {
        Channel::Beta
    } else {
        Channel::Stable
    };
    let assets = arches
        .iter()
        .map(|&arch| {
            let name = AssetName::new(APP, channel, &version, arch);
            Asset::new(
                name.as_str(),
                format!("https://github.com/apotenza92/dockter/releases/download/{tag}/{name}"),
                4096,
                None,
            )
        })
        .collect();
    ReleaseRecord {
        tag: tag.to_owned(),
        is_prerelease_flag: prerelease,
        assets,
        ..ReleaseRecord::default()
    }
}

fn read(path: &Utf8Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|err| panic!("read {path}: {err}"))
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("a stable release \"{tag}\" with both archives")]
fn given_stable_release(world: &mut PublishWorld, tag: String) {
    world.records.push(record(&tag, false, &Arch::ALL));
}

#[given("a prerelease \"{tag}\" with both archives")]
fn given_prerelease(world: &mut PublishWorld, tag: String) {
    world.records.push(record(&tag, true, &Arch::ALL));
}

#[given("a prerelease \"{tag}\" missing its \"{arch}\" archive")]
fn given_incomplete_prerelease(world: &mut PublishWorld, tag: String, arch: String) {
    let present: Vec<Arch> = Arch::ALL
        .into_iter()
        .filter(|candidate| candidate.as_str() != arch)
        .collect();
    world.records.push(record(&tag, true, &present));
}

#[given("a changelog covering every release")]
fn given_changelog(world: &mut PublishWorld) {
    let sections: String = world
        .records
        .iter()
        .map(|record| format!("## [{}]\n\n- Changes in {}.\n\n", record.tag, record.tag))
        .collect();
    std::fs::write(world.changelog(), format!("# Changelog\n\n{sections}"))
        .expect("write changelog");
}

#[given("a Sparkle signing key")]
fn given_signing_key(world: &mut PublishWorld) {
    world.signer = load_signer(Some(ZERO_SEED), true).expect("valid key");
}

#[when("appcasts are generated")]
fn when_appcasts_generated(world: &mut PublishWorld) {
    let releases = StubReleases(world.records.clone());
    let feeds = world.feeds();
    let changelog = world.changelog();
    let now = Utc
        .with_ymd_and_hms(2026, 3, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp");
    let outcome = generate_appcasts(
        &world.config,
        Collaborators {
            releases: &releases,
            fetcher: &world.fetcher,
        },
        AppcastOptions {
            output_dir: &feeds,
            changelog: &changelog,
            signer: world.signer.as_ref(),
            now,
        },
    );
    world.outcome = Some(outcome);
}

#[when("casks are updated")]
fn when_casks_updated(world: &mut PublishWorld) {
    let releases = StubReleases(world.records.clone());
    let tap = world.tap();
    let outcome = update_casks(
        &world.config,
        Collaborators {
            releases: &releases,
            fetcher: &world.fetcher,
        },
        CaskOptions {
            tap_path: &tap,
            pin_checksums: false,
        },
    );
    world.outcome = Some(outcome);
}

#[then("{count:usize} files are updated")]
fn then_files_updated(world: &mut PublishWorld, count: usize) {
    let outcome = world
        .outcome
        .as_ref()
        .expect("run attempted")
        .as_ref()
        .expect("run succeeded");
    assert_eq!(outcome.updated_count(), count);
}

#[then("the stable channel is skipped")]
fn then_stable_skipped(world: &mut PublishWorld) {
    assert!(world.reports().contains(&Report::Skipped {
        channel: Channel::Stable
    }));
    assert!(!world.feeds().join("stable-arm64.xml").exists());
}

#[then("the feed \"{file}\" advertises version \"{version}\"")]
fn then_feed_advertises(world: &mut PublishWorld, file: String, version: String) {
    let feed = read(&world.feeds().join(file));
    assert!(feed.contains(&format!(
        "<sparkle:shortVersionString>{version}</sparkle:shortVersionString>"
    )));
    assert!(feed.contains(&format!("- Changes in v{version}.")));
}

#[then("the run fails because \"{name}\" is missing")]
fn then_run_fails(world: &mut PublishWorld, name: String) {
    match world.outcome.as_ref().expect("run attempted") {
        Err(err @ PublisherError::Artifact(_)) => assert!(err.to_string().contains(&name)),
        other => panic!("expected a missing artefact error, got {other:?}"),
    }
}

#[then("no output files exist")]
fn then_no_outputs(world: &mut PublishWorld) {
    assert!(!world.feeds().exists());
    assert!(!world.tap().exists());
}

#[then("every feed carries a signature")]
fn then_feeds_signed(world: &mut PublishWorld) {
    for report in world.reports() {
        if let Report::File { path, .. } = report {
            assert!(read(path).contains("sparkle:edSignature=\""), "{path} unsigned");
        }
    }
}

#[then("every archive was downloaded once")]
fn then_downloaded_once(world: &mut PublishWorld) {
    let downloads = world.fetcher.downloads.borrow();
    let archives: usize = world.records.iter().map(|record| record.assets.len()).sum();
    assert_eq!(downloads.len(), archives);
    assert!(downloads.values().all(|&count| count == 1));
}

#[then("the cask \"{file}\" advertises version \"{version}\"")]
fn then_cask_advertises(world: &mut PublishWorld, file: String, version: String) {
    let cask = read(&world.tap().join("Casks").join(file));
    assert!(cask.contains(&format!("  version \"{version}\"\n")));
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/publish.feature", index = 0)]
fn scenario_rerun_is_idempotent(world: PublishWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/publish.feature", index = 1)]
fn scenario_stable_waits(world: PublishWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/publish.feature", index = 2)]
fn scenario_missing_architecture(world: PublishWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/publish.feature", index = 3)]
fn scenario_signed_feeds(world: PublishWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/publish.feature", index = 4)]
fn scenario_casks(world: PublishWorld) {
    let _ = world;
}
