use std::{
    convert::Infallible,
    fmt,
    path::PathBuf,
    str::FromStr,
    sync::mpsc::Sender,
    thread,
    time::Duration,
};

use image::RgbaImage;
use pictile_engine::{ImageSource, LoadStep, SourceChain, SourceError};

/// Remote images tried, in order, when no source is given on the command line.
pub const DEFAULT_SOURCE_URLS: [&str; 4] = [
    "https://source.unsplash.com/random/800x800/?landscape,nature",
    "https://picsum.photos/800/800",
    "https://source.unsplash.com/random/800x800/?city",
    "https://source.unsplash.com/random/800x800/?animal",
];

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Where to get a source image from, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    File(PathBuf),
    Url(String),
}

impl FromStr for SourceSpec {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Url(s.to_owned()))
        } else {
            Ok(Self::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

impl SourceSpec {
    pub fn defaults() -> Vec<Self> {
        DEFAULT_SOURCE_URLS
            .iter()
            .map(|url| Self::Url((*url).to_owned()))
            .collect()
    }

    /// Builds the fallback order: a local image first, then the listed
    /// sources, or the default URLs when none were listed.
    pub fn chain_order(image: Option<PathBuf>, sources: &[SourceSpec]) -> Vec<Self> {
        let rest = if sources.is_empty() {
            Self::defaults()
        } else {
            sources.to_vec()
        };
        image.map(Self::File).into_iter().chain(rest).collect()
    }

    fn into_source(self) -> Box<dyn ImageSource> {
        match self {
            Self::File(path) => Box::new(FileSource { path }),
            Self::Url(url) => Box::new(HttpSource { url }),
        }
    }
}

#[derive(Debug)]
struct FileSource {
    path: PathBuf,
}

impl ImageSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<RgbaImage, SourceError> {
        let image = image::open(&self.path).map_err(|e| SourceError {
            source_name: self.name(),
            reason: e.to_string(),
        })?;
        Ok(image.to_rgba8())
    }
}

#[derive(Debug)]
struct HttpSource {
    url: String,
}

impl HttpSource {
    fn fetch(&self) -> Result<RgbaImage, String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| e.to_string())?;
        let bytes = client
            .get(&self.url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(reqwest::blocking::Response::bytes)
            .map_err(|e| e.to_string())?;
        let image = image::load_from_memory(&bytes).map_err(|e| e.to_string())?;
        Ok(image.to_rgba8())
    }
}

impl ImageSource for HttpSource {
    fn name(&self) -> String {
        self.url.clone()
    }

    fn load(&self) -> Result<RgbaImage, SourceError> {
        tracing::debug!(url = %self.url, "downloading image");
        self.fetch().map_err(|reason| SourceError {
            source_name: self.name(),
            reason,
        })
    }
}

/// Progress messages from the loader thread.
#[derive(Debug)]
pub enum LoaderEvent {
    Attempting { name: String },
    Step(LoadStep),
}

/// Runs the source chain on a worker thread, reporting every attempt.
///
/// The thread stops early if the receiving side has gone away.
pub fn spawn_loader(specs: Vec<SourceSpec>, tx: Sender<LoaderEvent>) {
    let mut chain = SourceChain::new(specs.into_iter().map(SourceSpec::into_source).collect());
    thread::spawn(move || {
        while !chain.is_finished() {
            if let Some(name) = chain.next_source_name()
                && tx.send(LoaderEvent::Attempting { name }).is_err()
            {
                return;
            }
            if tx.send(LoaderEvent::Step(chain.attempt())).is_err() {
                return;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use image::Rgba;

    use super::*;

    #[test]
    fn test_parse_spec() {
        assert_eq!(
            "https://picsum.photos/800/800".parse::<SourceSpec>(),
            Ok(SourceSpec::Url("https://picsum.photos/800/800".to_owned()))
        );
        assert_eq!(
            "photos/cat.png".parse::<SourceSpec>(),
            Ok(SourceSpec::File(PathBuf::from("photos/cat.png")))
        );
    }

    #[test]
    fn test_chain_order() {
        let order = SourceSpec::chain_order(Some(PathBuf::from("a.png")), &[]);
        assert_eq!(order.len(), 5);
        assert_eq!(order[0], SourceSpec::File(PathBuf::from("a.png")));
        assert_eq!(order[1].to_string(), DEFAULT_SOURCE_URLS[0]);

        let listed = [SourceSpec::Url("https://example.com/x.png".to_owned())];
        let order = SourceSpec::chain_order(None, &listed);
        assert_eq!(order, listed);
    }

    #[test]
    fn test_loader_falls_back_to_next_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.png");
        RgbaImage::from_pixel(6, 4, Rgba([1, 2, 3, 255]))
            .save(&good)
            .unwrap();
        let specs = vec![
            SourceSpec::File(dir.path().join("missing.png")),
            SourceSpec::File(good),
        ];

        let (tx, rx) = mpsc::channel();
        spawn_loader(specs, tx);
        let events: Vec<_> = rx.iter().collect();

        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], LoaderEvent::Attempting { .. }));
        assert!(matches!(
            events[1],
            LoaderEvent::Step(LoadStep::Failed { index: 0, .. })
        ));
        let LoaderEvent::Step(LoadStep::Ready { index, image }) = &events[3] else {
            panic!("second file should load");
        };
        assert_eq!(*index, 1);
        assert_eq!(image.dimensions(), (6, 4));
    }

    #[test]
    fn test_loader_reports_exhaustion() {
        let (tx, rx) = mpsc::channel();
        spawn_loader(vec![SourceSpec::File(PathBuf::from("/nonexistent/x.png"))], tx);
        let last = rx.iter().last().unwrap();
        assert!(matches!(
            last,
            LoaderEvent::Step(LoadStep::Exhausted(ref e)) if e.attempts == 1
        ));
    }
}
