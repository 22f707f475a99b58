//! Directory index nodes.

use mdag_store::{ChildKind, ContentWriter, Link, Object};

use crate::config::BuildConfig;
use crate::error::BuildResult;
use crate::file::{build_file_tree, Built};
use crate::hierarchy::{DirNode, Node};

/// Build a directory: every child is built (files as chunk trees,
/// sub-directories recursively) and linked by name from one index node.
///
/// Links appear in the hierarchy's child order and carry each child's
/// declared size. The directory's own fan-out is not bounded.
pub fn build_dir(
    writer: &mut ContentWriter<'_>,
    config: &BuildConfig,
    dir: &DirNode,
) -> BuildResult<Built> {
    config.validate()?;
    build_listing(writer, config, dir)
}

fn build_listing(
    writer: &mut ContentWriter<'_>,
    config: &BuildConfig,
    dir: &DirNode,
) -> BuildResult<Built> {
    let mut links = Vec::with_capacity(dir.len());

    for child in dir.children() {
        let link = match child {
            Node::File(file) => {
                let bytes = file.bytes()?;
                let (built, _) = build_file_tree(writer, config, &bytes)?;
                Link::entry(file.name(), built.id, file.size(), built.object.file_kind())
            }
            Node::Dir(sub) => {
                let built = build_listing(writer, config, sub)?;
                Link::entry(sub.name(), built.id, sub.size(), ChildKind::Tree)
            }
        };
        links.push(link);
    }

    let object = Object::internal(links);
    let id = writer.commit(&object)?;
    Ok(Built {
        id,
        object,
        consumed: dir.size(),
    })
}
