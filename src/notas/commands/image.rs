use crate::commands::{CmdMessage, CmdResult};
use crate::corpus::Corpus;
use crate::error::{NotasError, Result};
use crate::model::ImageAsset;
use chrono::NaiveDate;
use sha1::{Digest, Sha1};
use tracing::info;
use unicode_normalization::UnicodeNormalization;

/// Stores an upload in the images folder of the directory nearest to
/// `context`, named `<hash prefix>_<YYYYMMDD>_<sanitized name>`.
///
/// The name is not a pure content address: the same bytes uploaded under the
/// same name on the same day land on the same file and overwrite it.
pub fn run(
    corpus: &Corpus,
    context: &str,
    bytes: &[u8],
    original_name: &str,
    today: NaiveDate,
) -> Result<CmdResult> {
    if bytes.is_empty() {
        return Err(NotasError::InvalidInput("no image data supplied".to_string()));
    }
    if original_name.trim().is_empty() {
        return Err(NotasError::InvalidInput("the upload has no file name".to_string()));
    }
    let safe_name = sanitize_filename(original_name);
    if safe_name.is_empty() {
        return Err(NotasError::InvalidInput(format!(
            "{:?} has no usable characters",
            original_name
        )));
    }

    let dir = corpus.nearest_directory(context)?;
    if corpus.is_trash(&dir) {
        return Err(NotasError::InvalidPath(format!("{} is in the trash", context)));
    }
    let images = dir.join(&corpus.config().images_dir);

    let file_name = format!(
        "{}_{}_{}",
        hash_prefix(bytes, corpus.config().hash_prefix_len),
        today.format("%Y%m%d"),
        safe_name
    );
    let target = images.join(&file_name);
    corpus.write_atomic(&target, bytes)?;

    let url = corpus.relative(&target);
    info!(url = %url, size = bytes.len(), "stored image");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Stored {}", url)));
    Ok(result.with_image(ImageAsset { url, file_name }))
}

fn hash_prefix(bytes: &[u8], len: usize) -> String {
    let hex = format!("{:x}", Sha1::digest(bytes));
    hex.chars().take(len).collect()
}

/// Reduces a client-supplied file name to `[A-Za-z0-9._-]`, with whitespace
/// runs and path separators turned into `_` and no leading or trailing dots
/// or underscores. Accented letters are folded to their ASCII base through
/// NFKD decomposition; anything else outside ASCII is dropped.
pub fn sanitize_filename(name: &str) -> String {
    let spaced: String = name
        .nfkd()
        .filter(|c| c.is_ascii())
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotasConfig;
    use std::fs;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }

    fn setup() -> (TempDir, Corpus) {
        let dir = TempDir::new().unwrap();
        let corpus = Corpus::open(dir.path(), NotasConfig::default()).unwrap();
        (dir, corpus)
    }

    #[test]
    fn stores_beside_document_with_derived_name() {
        let (_dir, corpus) = setup();
        fs::create_dir_all(corpus.root().join("trips")).unwrap();
        fs::write(corpus.root().join("trips/rome.md"), "").unwrap();

        let result = run(&corpus, "/trips/rome.md", b"hello", "My Photo.png", today()).unwrap();
        let image = result.image.unwrap();

        // sha1("hello") = aaf4c61d...
        assert_eq!(image.file_name, "aaf4c61d_20240229_My_Photo.png");
        assert_eq!(image.url, "/trips/images/aaf4c61d_20240229_My_Photo.png");
        assert_eq!(
            fs::read(corpus.root().join("trips/images/aaf4c61d_20240229_My_Photo.png")).unwrap(),
            b"hello"
        );
    }

    #[test]
    fn identical_upload_same_day_overwrites() {
        let (_dir, corpus) = setup();
        let first = run(&corpus, "/", b"bytes", "a.jpg", today()).unwrap();
        let second = run(&corpus, "/", b"bytes", "a.jpg", today()).unwrap();
        assert_eq!(first.image, second.image);

        let entries = fs::read_dir(corpus.root().join("images")).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_images_folder_is_refused() {
        let (_dir, corpus) = setup();
        let outside = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), corpus.root().join("images")).unwrap();

        assert!(matches!(
            run(&corpus, "/", b"hello", "a.png", today()),
            Err(NotasError::InvalidPath(_))
        ));
        assert_eq!(fs::read_dir(outside.path()).unwrap().count(), 0);
    }

    #[test]
    fn rejects_empty_uploads() {
        let (_dir, corpus) = setup();
        assert!(matches!(
            run(&corpus, "/", b"", "a.png", today()),
            Err(NotasError::InvalidInput(_))
        ));
        assert!(matches!(
            run(&corpus, "/", b"x", "", today()),
            Err(NotasError::InvalidInput(_))
        ));
        assert!(matches!(
            run(&corpus, "/", b"x", "../..", today()),
            Err(NotasError::InvalidInput(_))
        ));
    }

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("my cool  pic.png"), "my_cool_pic.png");
        assert_eq!(sanitize_filename("..\\win\\evil.jpg"), "win_evil.jpg");
        assert_eq!(sanitize_filename("fötö.png"), "foto.png");
        assert_eq!(sanitize_filename("Ñandú ﬁle.jpg"), "Nandu_file.jpg");
        assert_eq!(sanitize_filename("日本.png"), "png");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
    }
}
