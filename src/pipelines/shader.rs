//! WGSL source composition.
//!
//! Fragment programs are written as standalone WGSL files that pull shared
//! declarations in with `#include <name>` lines and leave build-time
//! constants as `${NAME}` placeholders. [`ShaderComposer`] resolves both
//! before the source reaches wgpu, which has no preprocessor of its own.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt::Display,
};

use anyhow::{Context as _, bail};

/// Chunks every program may include.
const BUILTIN_CHUNKS: [(&str, &str); 4] = [
    ("camera", include_str!("camera.wgsl")),
    ("sketch_vertex", include_str!("sketch_vertex.wgsl")),
    ("material", include_str!("material.wgsl")),
    ("simplex_noise", include_str!("simplex_noise.wgsl")),
];

#[derive(Clone, Debug)]
pub struct ShaderComposer {
    chunks: HashMap<String, String>,
    defines: BTreeMap<String, String>,
}

impl Default for ShaderComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderComposer {
    pub fn new() -> Self {
        Self {
            chunks: BUILTIN_CHUNKS
                .iter()
                .map(|(name, source)| (name.to_string(), source.to_string()))
                .collect(),
            defines: BTreeMap::new(),
        }
    }

    /// Register (or replace) an includable chunk.
    pub fn with_chunk(mut self, name: &str, source: &str) -> Self {
        self.chunks.insert(name.to_string(), source.to_string());
        self
    }

    /// Set the value substituted for `${name}`.
    pub fn define(mut self, name: &str, value: impl Display) -> Self {
        self.defines.insert(name.to_string(), value.to_string());
        self
    }

    /// Resolve includes and placeholders in `source`.
    ///
    /// Each chunk is pasted at most once; a second include of the same chunk
    /// is dropped. Unknown chunks and placeholders without a definition are
    /// errors.
    pub fn compose(&self, source: &str) -> anyhow::Result<String> {
        let mut included = HashSet::new();
        let mut out = String::with_capacity(source.len());
        self.expand(source, &mut included, &mut Vec::new(), &mut out)?;
        self.substitute(&out)
    }

    /// Compose `source` and wrap it for `create_shader_module`.
    pub fn descriptor<'a>(
        &self,
        label: &'a str,
        source: &str,
    ) -> anyhow::Result<wgpu::ShaderModuleDescriptor<'a>> {
        let composed = self
            .compose(source)
            .with_context(|| format!("failed to compose shader {label}"))?;
        log::debug!("composed shader {label} ({} bytes)", composed.len());
        Ok(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(composed.into()),
        })
    }

    fn expand(
        &self,
        source: &str,
        included: &mut HashSet<String>,
        stack: &mut Vec<String>,
        out: &mut String,
    ) -> anyhow::Result<()> {
        for line in source.lines() {
            let Some(name) = parse_include(line) else {
                out.push_str(line);
                out.push('\n');
                continue;
            };
            if stack.iter().any(|open| open == name) {
                bail!("include cycle: {} -> {name}", stack.join(" -> "));
            }
            if !included.insert(name.to_string()) {
                continue;
            }
            let chunk = self
                .chunks
                .get(name)
                .with_context(|| format!("unknown shader chunk <{name}>"))?;
            stack.push(name.to_string());
            self.expand(chunk, included, stack, out)?;
            stack.pop();
        }
        Ok(())
    }

    fn substitute(&self, source: &str) -> anyhow::Result<String> {
        let mut out = String::with_capacity(source.len());
        let mut rest = source;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find('}')
                .with_context(|| format!("unterminated placeholder near '{}'", excerpt(after)))?;
            let name = after[..end].trim();
            let value = self
                .defines
                .get(name)
                .with_context(|| format!("no value defined for ${{{name}}}"))?;
            out.push_str(value);
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

fn parse_include(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix("#include")?
        .trim()
        .strip_prefix('<')?
        .strip_suffix('>')
        .map(str::trim)
}

fn excerpt(s: &str) -> &str {
    let end = s.char_indices().nth(16).map_or(s.len(), |(i, _)| i);
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_nested_includes_once() {
        let composer = ShaderComposer::new()
            .with_chunk("a", "fn a() {}")
            .with_chunk("b", "#include <a>\nfn b() {}");
        let out = composer.compose("#include <b>\n#include <a>\nfn main() {}").unwrap();
        assert_eq!(out.matches("fn a()").count(), 1);
        assert!(out.find("fn a()").unwrap() < out.find("fn b()").unwrap());
    }

    #[test]
    fn substitutes_defines() {
        let composer = ShaderComposer::new().define("POINT_COUNT", 42);
        let out = composer
            .compose("var<uniform> points: array<vec4<f32>, ${POINT_COUNT}>;")
            .unwrap();
        assert!(out.contains("array<vec4<f32>, 42>"));
    }

    #[test]
    fn undefined_placeholder_is_an_error() {
        let err = ShaderComposer::new().compose("let n = ${POINT_COUNT}u;").unwrap_err();
        assert!(err.to_string().contains("POINT_COUNT"));
    }

    #[test]
    fn unknown_chunk_is_an_error() {
        assert!(ShaderComposer::new().compose("#include <nope>").is_err());
    }

    #[test]
    fn include_cycle_is_an_error() {
        let composer = ShaderComposer::new()
            .with_chunk("a", "#include <b>")
            .with_chunk("b", "#include <a>");
        assert!(composer.compose("#include <a>").is_err());
    }

    #[test]
    fn every_program_composes() {
        let composer = ShaderComposer::new().define("POINT_COUNT", 3);
        for source in [
            include_str!("flat_tint.wgsl"),
            include_str!("tiled_noise.wgsl"),
            include_str!("texture_lookup.wgsl"),
            include_str!("point_cloud_rim.wgsl"),
            include_str!("lines.wgsl"),
        ] {
            let out = composer.compose(source).unwrap();
            assert!(!out.contains("#include") && !out.contains("${"));
        }
    }
}
