//! Named format registry with editor toggle semantics.
//!
//! Editors refer to formats by name ("bold", "color", ...) and expect a
//! second press of the same button to undo the first. `Surrounder` keeps the
//! registered formats and picks between surround and unsurround from what
//! the range boundaries already sit in.

use std::collections::HashMap;
use std::fmt;

use smol_str::SmolStr;

use crate::content::ContentTree;
use crate::error::{Result, SurroundError};
use crate::find_above::try_find_closest;
use crate::format::SurroundFormat;
use crate::match_type::bool_matcher;
use crate::range::DomRange;
use crate::surround::{reformat, surround, unsurround};

pub struct Surrounder<D: ContentTree, T> {
    formats: HashMap<SmolStr, SurroundFormat<D, T>>,
}

impl<D: ContentTree, T> Default for Surrounder<D, T> {
    fn default() -> Self {
        Self {
            formats: HashMap::new(),
        }
    }
}

impl<D: ContentTree, T> fmt::Debug for Surrounder<D, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.formats.keys().collect();
        names.sort();
        f.debug_struct("Surrounder")
            .field("formats", &names)
            .finish()
    }
}

impl<D: ContentTree, T> Surrounder<D, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `format` under `name`, returning the format it replaced.
    pub fn register_format(
        &mut self,
        name: impl Into<SmolStr>,
        format: SurroundFormat<D, T>,
    ) -> Option<SurroundFormat<D, T>> {
        self.formats.insert(name.into(), format)
    }

    pub fn unregister_format(&mut self, name: &str) -> Option<SurroundFormat<D, T>> {
        self.formats.remove(name)
    }

    pub fn has_format(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    pub fn format(&self, name: &str) -> Option<&SurroundFormat<D, T>> {
        self.formats.get(name)
    }

    /// Replace the format registered as `name` with `update` applied to it.
    pub fn update_format(
        &mut self,
        name: &str,
        update: impl FnOnce(SurroundFormat<D, T>) -> SurroundFormat<D, T>,
    ) -> Result<()> {
        let (key, format) = self
            .formats
            .remove_entry(name)
            .ok_or_else(|| SurroundError::UnknownFormat(SmolStr::new(name)))?;
        self.formats.insert(key, update(format));
        Ok(())
    }

    /// Toggle the format `name` on `range`.
    ///
    /// The `exclusive` formats are removed first. If either boundary of the
    /// range then sits inside the format, it is taken off the range,
    /// otherwise it is put on. Unknown exclusive names are ignored.
    pub fn surround(
        &self,
        tree: &mut D,
        range: &DomRange<D::Node>,
        base: D::Node,
        name: &str,
        exclusive: &[&str],
    ) -> Result<DomRange<D::Node>> {
        let format = self.lookup(name)?;
        if range.is_collapsed() {
            return Ok(*range);
        }

        let cleared = self.remove_formats(tree, range, base, exclusive, &[])?;
        if is_surrounded_inner(tree, &cleared, base, format)? {
            tracing::debug!(target: "weaver::surround", format = name, "toggling off");
            unsurround(tree, &cleared, base, format)
        } else {
            tracing::debug!(target: "weaver::surround", format = name, "toggling on");
            surround(tree, &cleared, base, format)
        }
    }

    /// Put the format `name` on `range` whether or not it is already there.
    /// Suits parameterized formats like colors, where a second application
    /// changes the value instead of undoing the first.
    pub fn overwrite_surround(
        &self,
        tree: &mut D,
        range: &DomRange<D::Node>,
        base: D::Node,
        name: &str,
        exclusive: &[&str],
    ) -> Result<DomRange<D::Node>> {
        let format = self.lookup(name)?;
        if range.is_collapsed() {
            return Ok(*range);
        }

        let cleared = self.remove_formats(tree, range, base, exclusive, &[])?;
        surround(tree, &cleared, base, format)
    }

    /// Whether the start or end boundary of `range` sits inside the format
    /// `name`.
    pub fn is_surrounded(
        &self,
        tree: &D,
        range: &DomRange<D::Node>,
        base: D::Node,
        name: &str,
    ) -> Result<bool> {
        let format = self.lookup(name)?;
        range.validate(tree, base)?;
        is_surrounded_inner(tree, range, base, format)
    }

    /// Take `formats` off `range`, then reformat it with `reformats`.
    /// Unknown names are ignored.
    pub fn remove(
        &self,
        tree: &mut D,
        range: &DomRange<D::Node>,
        base: D::Node,
        formats: &[&str],
        reformats: &[&str],
    ) -> Result<DomRange<D::Node>> {
        if range.is_collapsed() {
            return Ok(*range);
        }
        self.remove_formats(tree, range, base, formats, reformats)
    }

    fn lookup(&self, name: &str) -> Result<&SurroundFormat<D, T>> {
        self.formats
            .get(name)
            .ok_or_else(|| SurroundError::UnknownFormat(SmolStr::new(name)))
    }

    fn remove_formats(
        &self,
        tree: &mut D,
        range: &DomRange<D::Node>,
        base: D::Node,
        formats: &[&str],
        reformats: &[&str],
    ) -> Result<DomRange<D::Node>> {
        let mut current = *range;
        for format in formats.iter().filter_map(|name| self.formats.get(*name)) {
            current = unsurround(tree, &current, base, format)?;
        }
        for format in reformats.iter().filter_map(|name| self.formats.get(*name)) {
            current = reformat(tree, &current, base, format)?;
        }
        Ok(current)
    }
}

fn is_surrounded_inner<D: ContentTree, T>(
    tree: &D,
    range: &DomRange<D::Node>,
    base: D::Node,
    format: &SurroundFormat<D, T>,
) -> Result<bool> {
    let matcher = bool_matcher(format);
    Ok(
        try_find_closest(tree, range.start().container, base, &matcher)?.is_some()
            || try_find_closest(tree, range.end().container, base, &matcher)?.is_some(),
    )
}
