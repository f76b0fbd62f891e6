#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;

use flate2::write::GzEncoder;
use flate2::Compression;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use tempfile::TempDir;

use listingintel::entities::Listing;
use listingintel::ImportConfig;

static INIT: Once = Once::new();

pub fn setup() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// A fresh SQLite store in its own temporary directory.
pub async fn temp_db() -> (TempDir, DatabaseConnection) {
    setup();
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("listings.sqlite").display());
    let db = listingintel::db::connect_to(&url).await.expect("connect");
    (dir, db)
}

pub async fn listing_count(db: &DatabaseConnection) -> u64 {
    Listing::find().count(db).await.expect("count")
}

pub fn quiet_config(file: &Path) -> ImportConfig {
    ImportConfig::default().with_file(file).with_quiet(true)
}

pub const HEADER: &str = "REFERENCE_NUMBER,AD_URLS,PROPERTY_TYPE,DEPT_CODE,ZIP_CODE,CITY,MARKETING_TYPE,PRICE,SURFACE,CONDOMINIUM_EXPENSES,ELEVATOR,GARDEN,BUILDING_TYPE,DEALER_TYPE";

/// CSV text with `HEADER` and the given data lines.
pub fn csv_text(rows: &[&str]) -> String {
    let mut text = String::from(HEADER);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

/// `count` well-formed rows with references `{prefix}-0`, `{prefix}-1`, ...
pub fn generated_rows(prefix: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                "{prefix}-{i},https://example.com/{i},APARTMENT,75,75001,Paris,SALE,{price},{surface},{fees},True,False,RECENT,AGENCY",
                price = 100_000 + i * 1_000,
                surface = 40 + i,
                fees = 1_200,
            )
        })
        .collect()
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

/// A gzip tar archive holding one `(name, contents)` entry per item.
pub fn write_tar_gz(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let encoder = GzEncoder::new(File::create(&path).expect("create archive"), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (entry_name, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, entry_name, contents.as_bytes())
            .expect("append entry");
    }
    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip");
    path
}

pub fn write_zip(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let mut writer = zip::ZipWriter::new(File::create(&path).expect("create archive"));
    for (entry_name, contents) in entries {
        writer
            .start_file(*entry_name, zip::write::SimpleFileOptions::default())
            .expect("start entry");
        writer.write_all(contents.as_bytes()).expect("write entry");
    }
    writer.finish().expect("finish zip");
    path
}
