//! Permissive URI handling: decomposition into named parts, resolution of
//! relative references against an explicit base, query/fragment data
//! merging, and relative/absolute path computation between two URIs.
//!
//! Every operation is total. Input that the grammar cannot decompose falls
//! back to a record that echoes the raw string; cross-origin relative
//! computation degrades to the absolute serialization instead of failing.

use std::fmt;

mod decompose;
mod query_data;

#[cfg(test)]
mod tests;

use decompose::{RawParts, decompose};
use query_data::{decode_pairs, encode_pairs};

/// Structured decomposition of a URI string.
///
/// All fields are optional; `query` and `fragment` are stored raw, without
/// their leading `?`/`#` and without percent-decoding. Values are immutable
/// once parsed: updating operations such as [`Uri::set_data`] return a new
/// `Uri` and leave the receiver untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Uri {
    scheme: Option<String>,
    user: Option<String>,
    password: Option<String>,
    host: Option<String>,
    port: Option<String>,
    directory: Option<String>,
    file: Option<String>,
    query: Option<String>,
    fragment: Option<String>,
}

/// Named accessor for the stored fields of a [`Uri`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Scheme,
    User,
    Password,
    Host,
    Port,
    Directory,
    File,
    Query,
    Fragment,
}

/// Which part of the URI a data read/merge operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataTarget {
    Query,
    Fragment,
}

impl Uri {
    /// Parses `input` without a base context.
    ///
    /// Absolute URIs are decomposed and normalized. A schemeless relative
    /// reference keeps its parts exactly as written so it can later be
    /// resolved via [`Uri::parse_with_base`], [`Uri::to_relative`], or
    /// [`Uri::to_absolute`]. Input the grammar cannot match at all yields a
    /// record whose `file` field holds the raw string.
    pub fn parse(input: &str) -> Self {
        match decompose(input) {
            Some(raw) => Self::from_raw(raw),
            None => Self::fallback(input),
        }
    }

    /// Parses `input`, resolving it against `base` when it has no scheme.
    ///
    /// `//authority` references inherit only the scheme; `/absolute` paths
    /// inherit the full authority (credentials included); anything else is
    /// appended to the base directory and dot-normalized. The query and
    /// fragment always come from `input`, never from `base`.
    pub fn parse_with_base(input: &str, base: &Uri) -> Self {
        let Some(raw) = decompose(input) else {
            return Self::fallback(input);
        };
        if raw.scheme.is_some() {
            return Self::from_raw(raw);
        }
        if raw.has_authority {
            let mut uri = Self::from_raw(raw);
            uri.scheme = base.scheme.clone();
            return uri;
        }
        let directory = match raw.directory.as_deref() {
            Some(dir) if dir.starts_with('/') => normalize_directory(dir),
            Some(dir) => {
                let base_dir = base.directory.as_deref().unwrap_or("/");
                normalize_directory(&format!("{base_dir}{dir}"))
            }
            None => normalize_directory(base.directory.as_deref().unwrap_or("/")),
        };
        Uri {
            scheme: base.scheme.clone(),
            user: base.user.clone(),
            password: base.password.clone(),
            host: base.host.clone(),
            port: base.port.clone(),
            directory: Some(directory),
            file: raw.file,
            query: raw.query,
            fragment: raw.fragment,
        }
    }

    fn from_raw(raw: RawParts) -> Self {
        let RawParts {
            scheme,
            user,
            password,
            has_authority,
            host,
            port,
            directory,
            file,
            query,
            fragment,
        } = raw;
        let directory = match directory {
            Some(dir) if dir.starts_with('/') => Some(normalize_directory(&dir)),
            // A schemeless relative reference keeps its path as written.
            Some(dir) => Some(dir),
            None if has_authority => Some("/".to_string()),
            None => None,
        };
        Uri {
            scheme,
            user,
            password,
            host,
            port,
            directory,
            file,
            query,
            fragment,
        }
    }

    fn fallback(input: &str) -> Self {
        Uri {
            file: if input.is_empty() {
                None
            } else {
                Some(input.to_string())
            },
            ..Uri::default()
        }
    }

    /// Returns the stored value of `field`, if present.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Scheme => self.scheme.as_deref(),
            Field::User => self.user.as_deref(),
            Field::Password => self.password.as_deref(),
            Field::Host => self.host.as_deref(),
            Field::Port => self.port.as_deref(),
            Field::Directory => self.directory.as_deref(),
            Field::File => self.file.as_deref(),
            Field::Query => self.query.as_deref(),
            Field::Fragment => self.fragment.as_deref(),
        }
    }

    /// True when both URIs share scheme, credentials, host, and effective
    /// port (the explicit port, or the scheme's default when omitted).
    pub fn same_origin(&self, other: &Uri) -> bool {
        self.scheme == other.scheme
            && self.user == other.user
            && self.password == other.password
            && self.host == other.host
            && self.effective_port() == other.effective_port()
    }

    fn effective_port(&self) -> Option<&str> {
        self.port
            .as_deref()
            .or_else(|| self.scheme.as_deref().and_then(default_port))
    }

    /// Decoded `(key, value)` pairs of the query string, in order of first
    /// occurrence.
    pub fn get_data(&self) -> Vec<(String, String)> {
        self.get_data_in(DataTarget::Query)
    }

    /// Decoded `(key, value)` pairs of the chosen target.
    pub fn get_data_in(&self, target: DataTarget) -> Vec<(String, String)> {
        decode_pairs(self.target_raw(target).unwrap_or(""))
    }

    /// Decoded value of a single query key.
    pub fn data_value(&self, key: &str) -> Option<String> {
        self.get_data()
            .into_iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Returns a new `Uri` whose query carries `data`.
    ///
    /// With `merge` set, existing keys keep their position and are
    /// overwritten where `data` names them; new keys are appended in
    /// argument order. Without `merge` the whole query is replaced.
    pub fn set_data(&self, data: &[(&str, &str)], merge: bool) -> Uri {
        self.set_data_in(data, merge, DataTarget::Query)
    }

    /// Like [`Uri::set_data`], but the target may also be the fragment.
    pub fn set_data_in(&self, data: &[(&str, &str)], merge: bool, target: DataTarget) -> Uri {
        let mut pairs = if merge {
            decode_pairs(self.target_raw(target).unwrap_or(""))
        } else {
            Vec::new()
        };
        for &(key, value) in data {
            match pairs.iter_mut().find(|(existing, _)| existing == key) {
                Some(entry) => entry.1 = value.to_string(),
                None => pairs.push((key.to_string(), value.to_string())),
            }
        }
        let serialized = encode_pairs(&pairs);
        let mut updated = self.clone();
        let slot = match target {
            DataTarget::Query => &mut updated.query,
            DataTarget::Fragment => &mut updated.fragment,
        };
        *slot = if serialized.is_empty() {
            None
        } else {
            Some(serialized)
        };
        updated
    }

    fn target_raw(&self, target: DataTarget) -> Option<&str> {
        match target {
            DataTarget::Query => self.query.as_deref(),
            DataTarget::Fragment => self.fragment.as_deref(),
        }
    }

    /// Shortest path from `base` to `self`.
    ///
    /// Cross-origin pairs return the absolute serialization of `self`. A
    /// schemeless `self` is first resolved against `base`. Identical
    /// directory-only URIs yield `./`.
    pub fn to_relative(&self, base: &Uri) -> String {
        let resolved;
        let subject = if self.scheme.is_none() && base.scheme.is_some() {
            resolved = Uri::parse_with_base(&self.to_string(), base);
            &resolved
        } else {
            self
        };
        if !subject.same_origin(base) {
            return subject.to_string();
        }
        let own_dir = subject.directory.as_deref().unwrap_or("/");
        let base_dir = base.directory.as_deref().unwrap_or("/");
        let own_segments: Vec<&str> = own_dir.split('/').filter(|s| !s.is_empty()).collect();
        let base_segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
        let common = own_segments
            .iter()
            .zip(&base_segments)
            .take_while(|(own, other)| own == other)
            .count();
        let mut relative = String::new();
        for _ in common..base_segments.len() {
            relative.push_str("../");
        }
        for segment in &own_segments[common..] {
            relative.push_str(segment);
            relative.push('/');
        }
        if let Some(file) = &subject.file {
            relative.push_str(file);
        }
        if relative.is_empty() {
            relative.push_str("./");
        }
        if let Some(query) = &subject.query {
            relative.push('?');
            relative.push_str(query);
        }
        if let Some(fragment) = &subject.fragment {
            relative.push('#');
            relative.push_str(fragment);
        }
        relative
    }

    /// Origin-local absolute form of `self` as seen from `base`.
    ///
    /// Same-origin pairs yield `directory + file + ?query + #fragment`;
    /// cross-origin pairs yield the full absolute serialization.
    pub fn to_absolute(&self, base: &Uri) -> String {
        let resolved;
        let subject = if self.scheme.is_none() && base.scheme.is_some() {
            resolved = Uri::parse_with_base(&self.to_string(), base);
            &resolved
        } else {
            self
        };
        if !subject.same_origin(base) {
            return subject.to_string();
        }
        let mut absolute = subject
            .directory
            .clone()
            .unwrap_or_else(|| "/".to_string());
        if let Some(file) = &subject.file {
            absolute.push_str(file);
        }
        if let Some(query) = &subject.query {
            absolute.push('?');
            absolute.push_str(query);
        }
        if let Some(fragment) = &subject.fragment {
            absolute.push('#');
            absolute.push_str(fragment);
        }
        absolute
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}://")?;
        }
        if let Some(user) = &self.user {
            f.write_str(user)?;
            if let Some(password) = &self.password {
                write!(f, ":{password}")?;
            }
            f.write_str("@")?;
        }
        if let Some(host) = &self.host {
            f.write_str(host)?;
        }
        if let Some(port) = &self.port {
            // Default ports stay implicit, the way browsers print them.
            if self.scheme.as_deref().and_then(default_port) != Some(port.as_str()) {
                write!(f, ":{port}")?;
            }
        }
        match &self.directory {
            Some(directory) => f.write_str(directory)?,
            None if self.host.is_some() => f.write_str("/")?,
            None => {}
        }
        if let Some(file) = &self.file {
            f.write_str(file)?;
        }
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

fn default_port(scheme: &str) -> Option<&'static str> {
    match scheme {
        "http" => Some("80"),
        "https" => Some("443"),
        "ftp" => Some("21"),
        "rtsp" => Some("554"),
        "mms" => Some("1755"),
        _ => None,
    }
}

/// Collapses `.` and `..` segments of an absolute directory path.
///
/// The result always starts and ends with `/`. A `..` with nothing left to
/// pop is dropped rather than kept, so a path never escapes the root.
pub(crate) fn normalize_directory(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    let mut out = String::from("/");
    for segment in segments {
        out.push_str(segment);
        out.push('/');
    }
    out
}
