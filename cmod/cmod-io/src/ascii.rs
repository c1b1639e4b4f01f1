//! The ASCII CMOD form.
//!
//! ```text
//! #celmodel__ascii
//!
//! material
//! <property line>
//! ...
//! end_material
//!
//! mesh
//! vertexdesc
//! <semantic token> <format token>
//! ...
//! end_vertexdesc
//!
//! vertices <count>
//! <one record per line, scalars in declaration order>
//!
//! trilist|tristrip|trifan <material index> <index count>
//! <indices>
//!
//! end_mesh
//! ```
//!
//! Blank lines between elements are ignored. Material property lines are
//! preserved as-is (trimmed); vertex records must sit on one line each,
//! while group indices may span lines.

use std::io::{BufRead, Write};

use cmod_types::{
    Material, Mesh, Model, PrimitiveGroup, PrimitiveKind, VertexDescription, VertexFormat,
    VertexSemantic,
};

use crate::error::{CmodError, CmodResult};
use crate::ASCII_SIGNATURE;

/// Line-oriented reader that tracks one-based line numbers.
struct LineReader<R> {
    inner: R,
    line_no: usize,
}

impl<R: BufRead> LineReader<R> {
    fn new(inner: R) -> Self {
        Self { inner, line_no: 0 }
    }

    /// The next line, trimmed, with its number; `None` at end of stream.
    fn next_line(&mut self) -> CmodResult<Option<(usize, String)>> {
        let mut buf = String::new();
        if self.inner.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        Ok(Some((self.line_no, buf.trim().to_owned())))
    }

    /// The next non-blank line; `None` at end of stream.
    fn next_content_line(&mut self) -> CmodResult<Option<(usize, String)>> {
        loop {
            match self.next_line()? {
                Some((_, line)) if line.is_empty() => {}
                other => return Ok(other),
            }
        }
    }

    /// The next non-blank line, or a parse error at end of stream.
    fn expect_content_line(&mut self, what: &str) -> CmodResult<(usize, String)> {
        self.next_content_line()?
            .ok_or_else(|| CmodError::parse(self.line_no + 1, format!("expected {what}")))
    }
}

/// Parse the body following the ASCII signature.
pub(crate) fn load_body<R: BufRead>(reader: &mut R) -> CmodResult<Model> {
    let mut lines = LineReader::new(reader);

    // Consume the remainder of the signature line.
    lines.next_line()?;

    let mut model = Model::new();
    while let Some((line_no, line)) = lines.next_content_line()? {
        match line.as_str() {
            "material" => model.add_material(load_material(&mut lines)?),
            "mesh" => model.add_mesh(load_mesh(&mut lines)?),
            other => {
                return Err(CmodError::parse(
                    line_no,
                    format!("expected material or mesh, found {other:?}"),
                ));
            }
        }
    }
    Ok(model)
}

fn load_material<R: BufRead>(lines: &mut LineReader<R>) -> CmodResult<Material> {
    let mut material = Material::new();
    loop {
        let (_, line) = lines.expect_content_line("end_material")?;
        if line == "end_material" {
            return Ok(material);
        }
        material.push_property(line);
    }
}

fn load_mesh<R: BufRead>(lines: &mut LineReader<R>) -> CmodResult<Mesh> {
    let (line_no, line) = lines.expect_content_line("vertexdesc")?;
    if line != "vertexdesc" {
        return Err(CmodError::parse(line_no, "expected vertexdesc"));
    }

    // Attribute pairs; offsets come from declaration-order packing.
    let mut formats = Vec::new();
    loop {
        let (line_no, line) = lines.expect_content_line("end_vertexdesc")?;
        if line == "end_vertexdesc" {
            break;
        }
        let mut tokens = line.split_whitespace();
        let (Some(semantic), Some(format), None) =
            (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(CmodError::parse(line_no, "expected <semantic> <format>"));
        };
        let semantic = VertexSemantic::from_token(semantic)
            .ok_or_else(|| CmodError::parse(line_no, format!("unknown semantic {semantic:?}")))?;
        let format = VertexFormat::from_token(format)
            .ok_or_else(|| CmodError::parse(line_no, format!("unknown format {format:?}")))?;
        formats.push((semantic, format));
    }
    let desc = VertexDescription::from_formats(formats)?;

    let (line_no, line) = lines.expect_content_line("vertices")?;
    let count: u32 = line
        .strip_prefix("vertices")
        .map(str::trim)
        .and_then(|rest| rest.parse().ok())
        .ok_or_else(|| CmodError::parse(line_no, "expected vertices <count>"))?;

    let mut data = Vec::new();
    for _ in 0..count {
        let (line_no, line) = lines.expect_content_line("a vertex record")?;
        load_record(&desc, line_no, &line, &mut data)?;
    }
    let mut mesh = Mesh::with_vertices(desc, count, data)?;

    loop {
        let (line_no, line) = lines.expect_content_line("end_mesh")?;
        if line == "end_mesh" {
            return Ok(mesh);
        }
        mesh.add_group(load_group(lines, line_no, &line, count)?);
    }
}

/// Parse one vertex record line into little-endian bytes.
fn load_record(
    desc: &VertexDescription,
    line_no: usize,
    line: &str,
    data: &mut Vec<u8>,
) -> CmodResult<()> {
    let mut tokens = line.split_whitespace();
    for attr in desc.attributes() {
        match attr.format {
            VertexFormat::UByte4 => {
                for _ in 0..4 {
                    let token = tokens
                        .next()
                        .ok_or_else(|| CmodError::parse(line_no, "vertex record too short"))?;
                    let byte: u8 = token.parse().map_err(|_| {
                        CmodError::parse(line_no, format!("expected a byte value, found {token:?}"))
                    })?;
                    data.push(byte);
                }
            }
            _ => {
                for _ in 0..attr.format.scalar_count() {
                    let token = tokens
                        .next()
                        .ok_or_else(|| CmodError::parse(line_no, "vertex record too short"))?;
                    let value: f32 = token.parse().map_err(|_| {
                        CmodError::parse(line_no, format!("expected a float, found {token:?}"))
                    })?;
                    data.extend_from_slice(&value.to_le_bytes());
                }
            }
        }
    }
    if tokens.next().is_some() {
        return Err(CmodError::parse(line_no, "vertex record too long"));
    }
    Ok(())
}

fn load_group<R: BufRead>(
    lines: &mut LineReader<R>,
    line_no: usize,
    header: &str,
    vertex_count: u32,
) -> CmodResult<PrimitiveGroup> {
    let mut tokens = header.split_whitespace();
    let (Some(kind), Some(material_index), Some(index_count), None) = (
        tokens.next(),
        tokens.next(),
        tokens.next(),
        tokens.next(),
    ) else {
        return Err(CmodError::parse(
            line_no,
            "expected <primitive> <material index> <index count>",
        ));
    };
    let kind = PrimitiveKind::from_token(kind)
        .ok_or_else(|| CmodError::parse(line_no, format!("unknown primitive {kind:?}")))?;
    let material_index: u32 = material_index
        .parse()
        .map_err(|_| CmodError::parse(line_no, "expected a material index"))?;
    let index_count: usize = index_count
        .parse()
        .map_err(|_| CmodError::parse(line_no, "expected an index count"))?;

    // Indices may span lines.
    let mut indices = Vec::new();
    while indices.len() < index_count {
        let (line_no, line) = lines.expect_content_line("group indices")?;
        for token in line.split_whitespace() {
            let index: u32 = token.parse().map_err(|_| {
                CmodError::parse(line_no, format!("expected a vertex index, found {token:?}"))
            })?;
            if index >= vertex_count {
                return Err(CmodError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
            indices.push(index);
        }
    }
    if indices.len() > index_count {
        return Err(CmodError::parse(
            lines.line_no,
            "more indices than declared",
        ));
    }

    Ok(PrimitiveGroup::new(kind, material_index, indices))
}

/// Save `model` in the ASCII form.
///
/// # Errors
///
/// Returns any error of the underlying writer.
pub fn save_model_ascii<W: Write>(model: &Model, writer: &mut W) -> CmodResult<()> {
    writer.write_all(ASCII_SIGNATURE)?;
    writeln!(writer)?;
    writeln!(writer)?;

    for material in model.materials() {
        writeln!(writer, "material")?;
        for property in material.properties() {
            writeln!(writer, "{property}")?;
        }
        writeln!(writer, "end_material")?;
        writeln!(writer)?;
    }

    for mesh in model.meshes() {
        writeln!(writer, "mesh")?;
        writeln!(writer, "vertexdesc")?;
        for attr in mesh.description().attributes() {
            writeln!(writer, "{} {}", attr.semantic.token(), attr.format.token())?;
        }
        writeln!(writer, "end_vertexdesc")?;
        writeln!(writer)?;

        writeln!(writer, "vertices {}", mesh.vertex_count())?;
        let stride = mesh.description().stride() as usize;
        for record in mesh.vertex_data().chunks_exact(stride) {
            save_record(mesh.description(), record, writer)?;
        }
        writeln!(writer)?;

        for group in mesh.groups() {
            writeln!(
                writer,
                "{} {} {}",
                group.kind.token(),
                group.material_index,
                group.indices.len()
            )?;
            let tokens: Vec<String> = group.indices.iter().map(u32::to_string).collect();
            writeln!(writer, "{}", tokens.join(" "))?;
            writeln!(writer)?;
        }

        writeln!(writer, "end_mesh")?;
        writeln!(writer)?;
    }

    Ok(())
}

/// Write one vertex record as scalars in declaration order.
fn save_record<W: Write>(
    desc: &VertexDescription,
    record: &[u8],
    writer: &mut W,
) -> CmodResult<()> {
    let mut tokens = Vec::new();
    for attr in desc.attributes() {
        let at = attr.offset as usize;
        match attr.format {
            VertexFormat::UByte4 => {
                for k in 0..4 {
                    tokens.push(record[at + k].to_string());
                }
            }
            _ => {
                for k in 0..attr.format.scalar_count() {
                    let mut bytes = [0u8; 4];
                    bytes.copy_from_slice(&record[at + k * 4..at + k * 4 + 4]);
                    tokens.push(f32::from_le_bytes(bytes).to_string());
                }
            }
        }
    }
    writeln!(writer, "{}", tokens.join(" "))?;
    Ok(())
}
