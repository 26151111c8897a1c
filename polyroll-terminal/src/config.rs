/// Command-line arguments and the style file. Loaded once at startup.
use polyroll_core::{parse_notation, DiceError, DieType, RenderStyle, RollRequest};
use std::path::{Path, PathBuf};

/// Style file looked up in the working directory when `--style` is absent.
pub const DEFAULT_STYLE_FILE: &str = "polyroll.ron";

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    /// Initial request; `d4` when no notation is given.
    pub request: RollRequest,
    pub style_path: Option<PathBuf>,
    /// Roll once immediately instead of starting on the preview.
    pub roll_now: bool,
}

impl CliArgs {
    /// Parse `[NOTATION] [--style PATH]`, skipping the program name.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, String> {
        let mut request = None;
        let mut style_path = None;
        let mut args = args.into_iter().skip(1);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--style" => {
                    let path = args.next().ok_or("--style needs a path")?;
                    style_path = Some(PathBuf::from(path));
                }
                _ if request.is_none() => {
                    request = Some(parse_notation(&arg).map_err(|e| e.to_string())?);
                }
                _ => return Err(format!("unexpected argument `{arg}`")),
            }
        }

        Ok(Self {
            roll_now: request.is_some(),
            request: request.unwrap_or_else(|| RollRequest::single(DieType::D4)),
            style_path,
        })
    }
}

/// Load the render style. A missing default file means defaults; a broken
/// file is logged and replaced by defaults.
pub fn load_style(path: Option<&Path>) -> RenderStyle {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (default_style_path(), false),
    };

    match RenderStyle::load(&path) {
        Ok(style) => {
            log::info!("loaded style from {:?}", path);
            style
        }
        Err(DiceError::Io(err)) if !explicit && err.kind() == std::io::ErrorKind::NotFound => {
            RenderStyle::default()
        }
        Err(err) => {
            log::warn!("Invalid style at {:?}: {}, using defaults", path, err);
            RenderStyle::default()
        }
    }
}

fn default_style_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(DEFAULT_STYLE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("polyroll")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_no_args() {
        let cli = CliArgs::parse(args(&[])).unwrap();
        assert_eq!(cli.request, RollRequest::single(DieType::D4));
        assert!(!cli.roll_now);
        assert!(cli.style_path.is_none());
    }

    #[test]
    fn test_notation_and_style() {
        let cli = CliArgs::parse(args(&["2d20+1", "--style", "mine.ron"])).unwrap();
        assert_eq!(cli.request, RollRequest::new(DieType::D20, 2, 1).unwrap());
        assert!(cli.roll_now);
        assert_eq!(cli.style_path, Some(PathBuf::from("mine.ron")));
    }

    #[test]
    fn test_bad_args() {
        assert!(CliArgs::parse(args(&["d7"])).is_err());
        assert!(CliArgs::parse(args(&["d6", "d8"])).is_err());
        assert!(CliArgs::parse(args(&["--style"])).is_err());
    }

    #[test]
    fn test_load_style_from_file() {
        let name = format!("polyroll-style-{}.ron", std::process::id());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, r##"(start_color: "#ff0000", edge_width: 1)"##).unwrap();
        let style = load_style(Some(&path));
        std::fs::remove_file(&path).unwrap();
        assert_eq!(style.start_color, "#ff0000");
        assert_eq!(style.edge_width, 1);
        assert_eq!(style.end_color, "lightgreen");
    }

    #[test]
    fn test_broken_style_falls_back() {
        let name = format!("polyroll-broken-{}.ron", std::process::id());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, "(opacity: \"full\")").unwrap();
        let style = load_style(Some(&path));
        std::fs::remove_file(&path).unwrap();
        assert_eq!(style, RenderStyle::default());
    }

    #[test]
    fn test_out_of_range_style_falls_back() {
        let name = format!("polyroll-range-{}.ron", std::process::id());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, "(opacity: 7.5)").unwrap();
        let style = load_style(Some(&path));
        std::fs::remove_file(&path).unwrap();
        assert_eq!(style, RenderStyle::default());
    }

    #[test]
    fn test_shipped_template_matches_defaults() {
        let style = RenderStyle::from_ron_str(include_str!("../polyroll.ron")).unwrap();
        assert_eq!(style, RenderStyle::default());
    }

    #[test]
    fn test_missing_explicit_file_falls_back() {
        let style = load_style(Some(Path::new("/nonexistent/polyroll.ron")));
        assert_eq!(style, RenderStyle::default());
    }
}
