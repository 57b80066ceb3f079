use std::fmt;
use std::io::Read;

/// How a downloaded resource is turned into on-disk content.
///
/// Selected purely from the resource's file name by [`Materializer::for_file_name`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Materializer {
    /// `.zip`, `.jar`, `.war`, `.ear`
    ZipLike,
    /// `.gz`, including `.tar.gz`
    GzipTar,
    /// `.tar`
    Tar,
    /// Anything else, copied verbatim.
    Raw,
}

const ZIP_SUFFIXES: [&str; 4] = [".zip", ".jar", ".war", ".ear"];

impl Materializer {
    /// Pick the materializer for `file_name`.
    ///
    /// Suffixes are matched case-sensitively, first match wins:
    /// zip-like, then `.gz`, then `.tar`, then raw copy.
    pub fn for_file_name(file_name: &str) -> Self {
        if ZIP_SUFFIXES.iter().any(|s| file_name.ends_with(s)) {
            Self::ZipLike
        } else if file_name.ends_with(".gz") {
            Self::GzipTar
        } else if file_name.ends_with(".tar") {
            Self::Tar
        } else {
            Self::Raw
        }
    }

    pub fn is_archive(self) -> bool { !matches!(self, Self::Raw) }

    pub(crate) fn tar_compress(self) -> Option<TarCompress> {
        match self {
            Self::GzipTar => Some(TarCompress::Gzip),
            Self::Tar => Some(TarCompress::None),
            Self::ZipLike | Self::Raw => None,
        }
    }
}

impl fmt::Display for Materializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZipLike => write!(f, "zip/jar/war/ear"),
            Self::GzipTar => write!(f, "gz"),
            Self::Tar => write!(f, "tar"),
            Self::Raw => write!(f, "raw"),
        }
    }
}

/// Compression codec for tar archives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TarCompress {
    None,
    Gzip,
}

impl TarCompress {
    /// Create a decoder for this compression codec.
    pub fn decoder<R: Read>(self, reader: R) -> Decoder<R> {
        match self {
            Self::None => Decoder::Passthrough(reader),
            Self::Gzip => Decoder::Gzip(Box::new(flate2::read::GzDecoder::new(reader))),
        }
    }
}

/// Decoder wrapper for tar decompression.
#[derive(Debug)]
pub enum Decoder<R> {
    Passthrough(R),
    Gzip(Box<flate2::read::GzDecoder<R>>),
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::Passthrough(r) => r.read(buf),
            Self::Gzip(d) => d.read(buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn zip_family_suffixes() {
        for name in ["archive.zip", "lib.jar", "app.war", "bundle.ear"] {
            assert_eq!(Materializer::for_file_name(name), Materializer::ZipLike, "{name}");
        }
    }

    #[test]
    fn gzip_suffixes() {
        assert_eq!(Materializer::for_file_name("archive.tar.gz"), Materializer::GzipTar);
        assert_eq!(Materializer::for_file_name("archive.gz"), Materializer::GzipTar);
    }

    #[test]
    fn tar_suffix() {
        assert_eq!(Materializer::for_file_name("archive.tar"), Materializer::Tar);
    }

    #[test]
    fn unknown_suffix_is_raw() {
        assert_eq!(Materializer::for_file_name("data.bin"), Materializer::Raw);
        assert_eq!(Materializer::for_file_name("README"), Materializer::Raw);
        assert_eq!(Materializer::for_file_name("archive.tgz"), Materializer::Raw);
        assert_eq!(Materializer::for_file_name("zip"), Materializer::Raw);
    }

    #[test]
    fn suffix_match_is_case_sensitive() {
        assert_eq!(Materializer::for_file_name("ARCHIVE.ZIP"), Materializer::Raw);
        assert_eq!(Materializer::for_file_name("archive.TAR"), Materializer::Raw);
        assert_eq!(Materializer::for_file_name("archive.tar.GZ"), Materializer::Raw);
    }

    #[test]
    fn first_matching_rule_wins() {
        // a gzipped zip is still routed by its last suffix
        assert_eq!(Materializer::for_file_name("weird.zip.gz"), Materializer::GzipTar);
        assert_eq!(Materializer::for_file_name("weird.tar.zip"), Materializer::ZipLike);
    }

    #[test]
    fn tar_compress_mapping() {
        assert_eq!(Materializer::GzipTar.tar_compress(), Some(TarCompress::Gzip));
        assert_eq!(Materializer::Tar.tar_compress(), Some(TarCompress::None));
        assert_eq!(Materializer::ZipLike.tar_compress(), None);
        assert!(!Materializer::Raw.is_archive());
    }

    #[test]
    fn compression_none_decoder() {
        let decoder = TarCompress::None.decoder(Cursor::new(b"hello"));
        assert!(matches!(decoder, Decoder::Passthrough(_)));
    }

    #[test]
    fn compression_gzip_decoder() {
        let decoder = TarCompress::Gzip.decoder(Cursor::new(vec![0x1f, 0x8b]));
        assert!(matches!(decoder, Decoder::Gzip(_)));
    }
}
