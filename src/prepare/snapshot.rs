use std::{fs::File, io::{BufReader, BufWriter, ErrorKind}, path::Path};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::{error::{Error, Result}, prepare::{clean::Cleaner, Prepared}};

/// bump whenever the layout of `Prepared` changes
pub const SNAPSHOT_VERSION: u32 = 2;

#[derive(Serialize)]
struct SnapshotRef<'a, N> {
    version: u32,
    value_type: &'a str,
    source: &'a str,
    cleaner: Cleaner,
    prepared: &'a Prepared<N>,
}

#[derive(Deserialize)]
struct SnapshotHeader {
    version: u32,
    value_type: String,
    source: String,
    cleaner: Cleaner,
}

#[derive(Deserialize)]
struct SnapshotOwned<N> {
    version: u32,
    value_type: String,
    source: String,
    cleaner: Cleaner,
    prepared: Prepared<N>,
}

/// Write `prepared` as CBOR to `path`.
/// `source` is the fingerprint of the dataset source it was built from.
pub fn save<N>(path: &Path, source: &str, cleaner: Cleaner, prepared: &Prepared<N>) -> Result<()>
where
    N: Serialize,
{
    let file = File::create(path)?;
    let snapshot = SnapshotRef {
        version: SNAPSHOT_VERSION,
        value_type: std::any::type_name::<N>(),
        source,
        cleaner,
        prepared,
    };
    serde_cbor::to_writer(BufWriter::new(file), &snapshot)
        .map_err(|e| Error::Snapshot(format!("write {}: {e}", path.display())))?;
    debug!(path = %path.display(), "snapshot written");
    Ok(())
}

/// Read a snapshot from `path`.
///
/// `Ok(None)` when there is no file, or when it was written by another
/// version, value type, source fingerprint or cleaner configuration.
pub fn load<N>(path: &Path, source: &str, cleaner: Cleaner) -> Result<Option<Prepared<N>>>
where
    N: DeserializeOwned,
{
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    // header only: serde_cbor skips unknown fields
    let header: SnapshotHeader = serde_cbor::from_reader(BufReader::new(file))
        .map_err(|e| Error::Snapshot(format!("read {}: {e}", path.display())))?;
    if header.version != SNAPSHOT_VERSION
        || header.value_type != std::any::type_name::<N>()
        || header.source != source
        || header.cleaner != cleaner
    {
        debug!(path = %path.display(), version = header.version, "snapshot does not match, ignoring");
        return Ok(None);
    }

    let file = File::open(path)?;
    let snapshot: SnapshotOwned<N> = serde_cbor::from_reader(BufReader::new(file))
        .map_err(|e| Error::Snapshot(format!("read {}: {e}", path.display())))?;
    debug_assert_eq!(snapshot.version, SNAPSHOT_VERSION);
    debug_assert_eq!(snapshot.value_type, header.value_type);
    debug_assert_eq!(snapshot.source, source);
    debug_assert_eq!(snapshot.cleaner, cleaner);
    Ok(Some(snapshot.prepared))
}
