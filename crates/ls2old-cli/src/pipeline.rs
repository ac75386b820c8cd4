//! The end-to-end migration pipeline: extract, convert, upload.

use crate::config::Settings;
use crate::error::Result;
use crate::output::Printer;
use ls2old_client::{FieldDbClient, OldClient};
use ls2old_converter::{ConvertConfig, Converter};
use ls2old_extractor::{Extractor, ExtractorConfig};
use ls2old_uploader::{UploadConfig, Uploader};
use std::fs;

/// Run the whole migration with the given settings.
pub fn run(settings: &Settings, printer: &Printer) -> Result<()> {
    printer.section(&format!(
        "Extracting LingSync corpus {} from {}",
        settings.ls_corpus, settings.ls_url
    ));
    let source = FieldDbClient::new(&settings.ls_url, &settings.ls_username, &settings.ls_password)?;
    let extractor = Extractor::new(
        source,
        ExtractorConfig {
            work_dir: settings.work_dir.clone(),
            corpus: settings.ls_corpus.clone(),
            server_url: settings.ls_url.clone(),
            force_download: settings.force_download,
        },
    );
    let extraction = extractor.extract()?;
    match extraction.document_count {
        Some(count) => printer.line(&format!(
            "Downloaded {} documents to {}.",
            count,
            extraction.path.display()
        )),
        None => printer.line(&format!(
            "Reusing the existing dump at {}.",
            extraction.path.display()
        )),
    }

    printer.section("Converting to OLD resources");
    let convert_config = ConvertConfig {
        work_dir: settings.work_dir.clone(),
        corpus: settings.ls_corpus.clone(),
        force_convert: settings.force_convert,
        force_media_download: settings.force_file_download,
        migrate_large_media: settings.migrate_large_media,
    };
    let conversion = Converter::new(convert_config.clone()).convert(&extraction.path)?;
    if !conversion.converted {
        printer.line(&format!(
            "Reusing the staged resources at {}.",
            conversion.path.display()
        ));
    }
    if let Ok(summary) = fs::read_to_string(convert_config.destination_summary_path()) {
        printer.report(&summary);
    }
    let warnings_path = convert_config.warnings_report_path();
    if conversion.converted && conversion.warnings.count() > 0 {
        printer.caution(&format!(
            "{} conversion warnings were generated; the report is at {}.",
            conversion.warnings.count(),
            warnings_path.display()
        ));
    }
    if settings.verbose {
        if let Ok(report) = fs::read_to_string(&warnings_path) {
            printer.report(&report);
        }
    }

    printer.section(&format!("Uploading to the OLD at {}", settings.old_url));
    let service = OldClient::new(&settings.old_url)?;
    let uploader = Uploader::new(
        service,
        UploadConfig {
            username: settings.old_username.clone(),
            password: settings.old_password.clone(),
            corpus: settings.ls_corpus.clone(),
            overwrite_users: settings.overwrite_users,
            overwrite_speakers: settings.overwrite_speakers,
        },
    );
    let upload = uploader.upload(&conversion.store)?;
    printer.report(&upload.report.render());
    printer.line(&format!(
        "Everything created during this migration is tagged '{}'.",
        upload.migration_tag_name
    ));
    printer.section("Migration complete.");
    printer.caution(
        "Please verify the migrated data in the Dative/OLD interface; the \
         conversion warnings report lists everything that needs a human eye.",
    );
    Ok(())
}
