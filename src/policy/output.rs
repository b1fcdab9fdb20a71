use std::path::PathBuf;

/// Directory part of an output template.
///
/// Everything after the last `/` or `\` is the filename pattern and is
/// dropped, so templates written on either platform resolve. A template
/// without any separator writes into the working directory.
pub fn output_dir_from_template(template: &str) -> PathBuf {
    match template.rfind(['/', '\\']) {
        Some(0) => PathBuf::from(&template[..1]),
        Some(idx) => PathBuf::from(&template[..idx]),
        None => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_template() {
        assert_eq!(
            output_dir_from_template("/home/me/unidown/output/%(title)s.%(ext)s"),
            PathBuf::from("/home/me/unidown/output")
        );
    }

    #[test]
    fn test_windows_template() {
        assert_eq!(
            output_dir_from_template(r"C:\Users\me\unidown\output\%(title)s.%(ext)s"),
            PathBuf::from(r"C:\Users\me\unidown\output")
        );
    }

    #[test]
    fn test_mixed_separators_use_last() {
        assert_eq!(
            output_dir_from_template(r"C:\Users\me/output\%(title)s.%(ext)s"),
            PathBuf::from(r"C:\Users\me/output")
        );
    }

    #[test]
    fn test_bare_pattern_and_root() {
        assert_eq!(output_dir_from_template("%(title)s.%(ext)s"), PathBuf::from("."));
        assert_eq!(output_dir_from_template("/%(title)s.%(ext)s"), PathBuf::from("/"));
    }
}
