//! Integration tests verifying stores and decorators compose as designed.
//!
//! These tests verify that:
//! 1. The tree store synthesizes directories and honors its write contract
//! 2. A third-party store implementing only `open` works everywhere
//! 3. Decorators stack over any store, including trait objects
//! 4. Error handling provides useful context

use std::io::{Read, Seek, SeekFrom, Write};
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use virtfs::*;

// =============================================================================
// Minimal Third-Party Store
// =============================================================================

/// A store keeping files in insertion order, with no directory support of
/// its own: `open` projects it into a `Tree`. This proves `open` is the only
/// method a store must provide.
struct ListFs {
    files: Vec<File>,
}

impl ListFs {
    fn new(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(path, data)| File::new(*data).with_path(*path))
                .collect(),
        }
    }
}

impl FsRead for ListFs {
    fn open(&self, path: &str) -> Result<Box<dyn VFile>, FsError> {
        let tree: Tree = self
            .files
            .iter()
            .map(|f| (f.path.clone(), f.clone()))
            .collect();
        tree.open(path)
    }
}

fn names(fs: &(impl FsRead + ?Sized), dir: &str) -> Vec<String> {
    fs.read_dir(dir)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect()
}

// =============================================================================
// Tree Store
// =============================================================================

#[test]
fn tree_lists_synthesized_and_explicit_entries() {
    let tree: Tree = [
        ("bud/view/index.svelte", File::new("<h1>index</h1>")),
        ("bud/view/about/index.svelte", File::new("<h1>about</h1>")),
        ("bud/view", File::dir().with_mode(FileMode::DEFAULT_DIR)),
    ]
    .into_iter()
    .collect();

    assert_eq!(names(&tree, "."), ["bud"]);
    assert_eq!(names(&tree, "bud"), ["view"]);
    assert_eq!(names(&tree, "bud/view"), ["about", "index.svelte"]);

    let listing = tree.read_dir("bud").unwrap();
    assert_eq!(listing[0].mode, FileMode::DEFAULT_DIR);
    assert!(tree.stat("bud/view/about").unwrap().is_dir());
}

#[test]
fn tree_write_read_delete_cycle() {
    let at = UNIX_EPOCH + Duration::from_secs(1_628_089_020);
    let tree = Tree::new().with_clock(Arc::new(FixedClock(at)));

    tree.write_file("a/b.txt", b"b", FileMode::DEFAULT_FILE)
        .unwrap();
    tree.mkdir_all("a/c", FileMode::DEFAULT_DIR).unwrap();
    tree.write_file("a/c/d.txt", b"d", FileMode(0o600)).unwrap();
    assert_eq!(tree.len(), 3);
    assert_eq!(names(&tree, "a"), ["b.txt", "c"]);

    let info = tree.stat("a/c/d.txt").unwrap();
    assert_eq!(info.mod_time, Some(at));
    assert_eq!(info.stamp(), "1:-rw-------:1628089020000000000");

    tree.remove_all("a/c").unwrap();
    assert_eq!(tree.paths(), ["a/b.txt"]);
    tree.remove_all("a").unwrap();
    assert!(tree.is_empty());
    assert!(tree.read_dir(".").unwrap().is_empty());
}

#[test]
fn tree_handle_reads_seeks_and_writes_in_place() {
    let tree: Tree = [("f.txt", File::new("abcdef"))].into_iter().collect();
    let mut h = tree.open("f.txt").unwrap();
    h.seek(SeekFrom::Start(2)).unwrap();
    h.write_all(b"XY").unwrap();
    h.seek(SeekFrom::Start(0)).unwrap();
    let mut s = String::new();
    h.read_to_string(&mut s).unwrap();
    assert_eq!(s, "abXYef");
    // the handle writes through to the store
    assert_eq!(tree.read_file("f.txt").unwrap(), b"abXYef");
    assert!(h.seek(SeekFrom::Current(1)).is_err());
    h.close().unwrap();
}

#[test]
fn tree_directory_handle_pages() {
    let tree: Tree = [
        ("d/1", File::new("")),
        ("d/2", File::new("")),
        ("d/3/x", File::new("")),
    ]
    .into_iter()
    .collect();
    let mut h = tree.open("d").unwrap();
    assert_eq!(h.read_dir(Some(2)).unwrap().len(), 2);
    let rest = h.read_dir(Some(2)).unwrap();
    assert_eq!(rest.len(), 1);
    assert!(rest[0].is_dir());
    assert!(h.read_dir(Some(2)).unwrap().is_empty());
    assert!(h.read(&mut [0u8; 1]).is_err());
}

// =============================================================================
// Third-Party Store
// =============================================================================

#[test]
fn list_store_serves_every_default_method() {
    let fs = ListFs::new(&[("b/b.txt", "b"), ("a.txt", "a")]);
    assert_eq!(names(&fs, "."), ["a.txt", "b"]);
    assert_eq!(fs.read_file("b/b.txt").unwrap(), b"b");
    assert!(fs.is_dir("b").unwrap());
    assert!(matches!(fs.read_file("b"), Err(FsError::NotAFile { .. })));
}

#[test]
fn list_store_syncs_into_tree() {
    let from = ListFs::new(&[("x/y.txt", "y")]);
    let to = Tree::new();
    sync_fs(&from, &to, ".").unwrap();
    assert_eq!(to.paths(), ["x", "x/y.txt"]);
    assert_eq!(to.stat("x/y.txt").unwrap().mode, FileMode::DEFAULT_FILE);
}

// =============================================================================
// Decorators
// =============================================================================

#[test]
fn mount_prints_nested() {
    let src: Map = [("a.txt", "a"), ("b/b.txt", "b")].into_iter().collect();
    let fs = Mount::new("nested/src", src).unwrap();
    let expected = "\
.
└── nested
    └── src
        ├── a.txt
        └── b
            └── b.txt
";
    assert_eq!(print(&fs, ".").unwrap(), expected);
}

#[test]
fn merge_of_mounts() {
    let views: Map = [("index.svelte", "index")].into_iter().collect();
    let controllers: Map = [("controller.go", "package controller")].into_iter().collect();
    let fs = Merge::new(vec![
        Box::new(Mount::new("bud/view", views).unwrap()),
        Box::new(Mount::new("bud/controller", controllers).unwrap()),
    ]);
    assert_eq!(names(&fs, "bud"), ["controller", "view"]);
    assert_eq!(
        fs.read_file("bud/controller/controller.go").unwrap(),
        b"package controller"
    );
}

#[test]
fn decorators_wrap_trait_objects() {
    let tree: Tree = [("app/a.txt", File::new("a")), ("app/b.txt", File::new("b"))]
        .into_iter()
        .collect();
    let shared: Arc<dyn Fs> = Arc::new(tree);
    let fs = Exclude::new(
        Sub::new(Arc::clone(&shared), "app").unwrap(),
        |p: &str| p == "b.txt",
    );
    assert_eq!(names(&fs, "."), ["a.txt"]);
    fs.write_file("c.txt", b"c", FileMode::DEFAULT_FILE).unwrap();
    assert_eq!(shared.read_file("app/c.txt").unwrap(), b"c");
}

#[test]
fn sub_over_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let os = OsFs::new(tmp.path());
    os.mkdir_all("www/static", FileMode::DEFAULT_DIR).unwrap();
    let sub = Sub::new(&os, "www").unwrap();
    sub.write_file("static/app.js", b"1", FileMode::DEFAULT_FILE)
        .unwrap();
    assert_eq!(names(&sub, "static"), ["app.js"]);
    assert!(tmp.path().join("www/static/app.js").exists());
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn error_invalid_path_names_operation() {
    let err = Tree::new().open("../etc").unwrap_err();
    assert_eq!(err.to_string(), "open: invalid path: \"../etc\"");
}

#[test]
fn error_already_exists_contains_context() {
    let tree = Tree::new();
    tree.mkdir_all("d", FileMode::DEFAULT_DIR).unwrap();
    let err = tree.write_file("d", b"", FileMode::DEFAULT_FILE).unwrap_err();
    assert_eq!(err.to_string(), "write_file: already exists: d");
}

#[test]
fn error_not_found_contains_path() {
    let err = Tree::new().read_file("missing/file.txt").unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("missing/file.txt"));
}

#[test]
fn error_not_supported_for_write_flags() {
    let tree: Tree = [("a", File::new("a"))].into_iter().collect();
    let err = tree
        .open_file("a", OpenFlags::READ_WRITE, FileMode::default())
        .unwrap_err();
    assert_eq!(err.to_string(), "open_file: not supported: a");
}
