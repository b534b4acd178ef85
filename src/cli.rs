use std::path::PathBuf;

/// Positional arguments of a backup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub manifest: PathBuf,
    pub target: PathBuf,
}

/// Text printed when the program is started without enough arguments.
pub fn usage_message(program: &str) -> String {
    format!(
        "usage: {} <input file> <target folder>\n input file: path to file which holds on each line the file or folders to be recursively backed up\n",
        program
    )
}

/// `None` means fewer than two positional arguments were given.
/// Anything past the second is ignored.
pub fn parse_args<I>(args: I) -> Option<Invocation>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().skip(1);
    let manifest = args.next()?;
    let target = args.next()?;
    Some(Invocation {
        manifest: PathBuf::from(manifest),
        target: PathBuf::from(target),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_two_arguments() {
        let invocation = parse_args(argv(&["mirror-backup", "list.txt", "/backup"])).unwrap();
        assert_eq!(invocation.manifest, PathBuf::from("list.txt"));
        assert_eq!(invocation.target, PathBuf::from("/backup"));
    }

    #[test]
    fn test_too_few_arguments() {
        assert_eq!(parse_args(argv(&["mirror-backup"])), None);
        assert_eq!(parse_args(argv(&["mirror-backup", "list.txt"])), None);
        assert_eq!(parse_args(Vec::new()), None);
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let invocation = parse_args(argv(&["prog", "a", "b", "c"])).unwrap();
        assert_eq!(invocation.target, PathBuf::from("b"));
    }

    #[test]
    fn test_usage_message() {
        assert_eq!(
            usage_message("mybackup"),
            "usage: mybackup <input file> <target folder>\n input file: path to file which holds on each line the file or folders to be recursively backed up\n"
        );
    }
}
