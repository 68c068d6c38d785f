//! Shell command construction
//!
//! Every command shipyard runs on a host is built here, so quoting lives in
//! one place. Arguments made only of safe characters stay bare; everything
//! else is single-quoted.

use std::path::Path;

/// Marker echoed by existence checks
pub const EXISTS_MARKER: &str = "__shipyard_exists__";

/// Quote one shell argument
pub fn quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ':' | '@' | '%' | '+' | '=' | ',')
        });
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

/// Quote a path argument
pub fn quote_path(path: &Path) -> String {
    quote(&path.to_string_lossy())
}

/// Builds shell command strings for host operations
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandBuilder;

impl CommandBuilder {
    pub fn copy_recursive(&self, source: &Path, destination: &Path) -> String {
        format!("cp -r {} {}", quote_path(source), quote_path(destination))
    }

    pub fn remove_recursive(&self, path: &Path) -> String {
        format!("rm -rf {}", quote_path(path))
    }

    /// Atomically replace `target` with `source` (GNU `mv -T`)
    pub fn move_and_replace(&self, source: &Path, target: &Path) -> String {
        format!("mv -T {} {}", quote_path(source), quote_path(target))
    }

    pub fn create_symlink(&self, link: &Path, destination: &Path) -> String {
        format!("ln -s {} {}", quote_path(destination), quote_path(link))
    }

    pub fn uncompress_tar_gz(&self, archive: &Path, folder: &Path) -> String {
        format!("tar -xzf {} -C {}", quote_path(archive), quote_path(folder))
    }

    /// Pack the contents of `folder` into `folder/file_name`.
    ///
    /// The archive is touched first so tar does not complain about the file
    /// changing while it is read.
    pub fn compress_tar_gz(&self, folder: &Path, file_name: &str) -> String {
        let archive = folder.join(file_name);
        format!(
            "touch {archive} && tar -czvf {archive} --exclude={file} -C {folder} .",
            archive = quote_path(&archive),
            file = quote(file_name),
            folder = quote_path(folder),
        )
    }

    /// Shallow checkout of `commitish` into `path`, without git metadata
    pub fn shallow_checkout(&self, repository: &str, commitish: &str, path: &Path) -> String {
        let path = quote_path(path);
        let url = quote(&repository_url(repository));
        let commitish = quote(commitish);
        format!(
            "git init {path} && git -C {path} remote add origin {url} && git -C {path} fetch --depth 1 origin {commitish} && git -C {path} checkout FETCH_HEAD && rm -rf {path}/.git"
        )
    }

    pub fn create_folder(&self, path: &Path) -> String {
        format!("mkdir -m 0777 -p {}", quote_path(path))
    }

    pub fn test_folder_exists(&self, path: &Path) -> String {
        format!("test -d {} && echo \"{}\"", quote_path(path), EXISTS_MARKER)
    }

    pub fn test_file_exists(&self, path: &Path) -> String {
        format!("test -f {} && echo \"{}\"", quote_path(path), EXISTS_MARKER)
    }

    /// List immediate sub-folders, one per line with a trailing slash.
    ///
    /// A missing or empty `dir` prints nothing and exits 0, so any failure
    /// is a real one.
    pub fn list_folders(&self, dir: &Path) -> String {
        format!(
            "set -- {}/*/; test -d \"$1\" || exit 0; ls -1d \"$@\"",
            quote_path(dir)
        )
    }

    /// Transfer with `-s` so remote paths are never word-split
    pub fn rsync(&self, source: &str, destination: &str) -> String {
        format!("rsync -chavzPs {} {}", quote(source), quote(destination))
    }

    /// Run `command` on `destination` through ssh
    pub fn ssh(&self, destination: &str, command: &str) -> String {
        format!("ssh {} {}", quote(destination), quote(command))
    }

    pub fn in_folder(&self, folder: &Path, command: &str) -> String {
        format!("cd {} && {}", quote_path(folder), command)
    }
}

/// Plain `owner/name` repositories resolve to GitHub over ssh
fn repository_url(repository: &str) -> String {
    let looks_like_location = repository.contains("://")
        || repository.contains('@')
        || repository.starts_with('/')
        || repository.starts_with('.');
    if looks_like_location {
        repository.to_string()
    } else {
        format!("git@github.com:{}", repository)
    }
}
