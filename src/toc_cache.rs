//! TOC Cache - flat text index of scenes and truth boxes
//!
//! Lets a run reload truth data without re-parsing every metadata file.
//! One scene per line, tab-separated:
//!
//! ```text
//! sceneId<TAB>relativeDir<TAB>t1;t2;...;<TAB>boxId;category<TAB>boxId;category...
//! ```
//!
//! Box geometry is not cached; scoring does not need it.

use crate::categories::normalize_category;
use crate::data::{Scene, TruthData};
use crate::error::{Result, ScoringError};
use crate::ingest::{CategoryCap, IngestOptions};
use crate::BoxId;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const TOC_FILE_NAME: &str = "toc.txt";

/// Write `<data_dir>/toc.txt` for the given truth data
pub fn write_toc_file(truth: &TruthData, data_dir: &Path) -> Result<PathBuf> {
    let path = data_dir.join(TOC_FILE_NAME);
    let file = File::create(&path).map_err(|e| ScoringError::io(&path, e))?;
    let mut writer = BufWriter::new(file);
    write_toc(truth, data_dir, &mut writer).map_err(|e| ScoringError::io(&path, e))?;
    writer.flush().map_err(|e| ScoringError::io(&path, e))?;

    tracing::info!("Wrote {} scenes to {}", truth.scene_count(), path.display());
    Ok(path)
}

/// Write one TOC line per scene, in scene ID order
pub fn write_toc<W: Write>(truth: &TruthData, data_dir: &Path, writer: &mut W) -> std::io::Result<()> {
    let boxes_by_scene = truth.boxes_by_scene();
    for scene in truth.scenes() {
        let boxes = boxes_by_scene
            .get(scene.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        writeln!(writer, "{}", format_toc_line(scene, boxes, data_dir))?;
    }
    Ok(())
}

pub fn format_toc_line(scene: &Scene, boxes: &[(BoxId, &str)], data_dir: &Path) -> String {
    let mut line = String::with_capacity(64 + boxes.len() * 24);
    line.push_str(&scene.id);
    line.push('\t');
    line.push_str(&relative_dir(&scene.dir, data_dir));
    line.push('\t');
    for t in &scene.temporal_indices {
        line.push_str(&t.to_string());
        line.push(';');
    }
    for (id, category) in boxes {
        line.push('\t');
        line.push_str(&id.to_string());
        line.push(';');
        line.push_str(category);
    }
    line
}

/// Scene directory relative to the data root, `/`-separated
fn relative_dir(dir: &Path, data_dir: &Path) -> String {
    let rel = match dir.strip_prefix(data_dir) {
        Ok(rel) => rel,
        Err(_) => {
            tracing::warn!(
                "Scene directory {} is outside {}, storing it as is",
                dir.display(),
                data_dir.display()
            );
            dir
        }
    };
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolve a stored relative directory against the data root
fn resolve_dir(rel: &str, data_dir: &Path) -> PathBuf {
    rel.split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .fold(data_dir.to_path_buf(), |dir, part| dir.join(part))
}

/// Read the TOC file, applying the scene filter and category cap
pub fn read_toc_file(path: &Path, opts: &IngestOptions) -> Result<TruthData> {
    let file = File::open(path).map_err(|e| ScoringError::io(path, e))?;
    read_toc(BufReader::new(file), path, opts)
}

pub fn read_toc<R: BufRead>(reader: R, source: &Path, opts: &IngestOptions) -> Result<TruthData> {
    let mut truth = TruthData::new();
    let mut cap = CategoryCap::new(opts.max_per_category);

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| ScoringError::io(source, e))?;
        if line.trim().is_empty() {
            continue;
        }

        let scene_id = line.split('\t').next().unwrap_or_default();
        if let Some(filter) = opts.scene_filter {
            if !filter.is_match(scene_id) {
                continue;
            }
        }

        if cap.is_bounded() {
            // The first box carries the scene's canonical category
            if let Some(category) = first_box_category(&line, line_no)? {
                if !cap.admit(category) {
                    continue;
                }
            }
        }

        let (scene, boxes) = parse_toc_line(&line, line_no, opts.data_dir)?;
        let scene_id = scene.id.clone();
        if truth.insert_scene(scene).is_some() {
            return Err(ScoringError::MalformedTocLine {
                line_no,
                reason: format!("duplicate scene '{}'", scene_id),
            });
        }
        for (box_id, category) in boxes {
            truth.insert_box(box_id, Some(category), &scene_id);
        }
    }

    Ok(truth)
}

fn first_box_category(line: &str, line_no: usize) -> Result<Option<&str>> {
    match line.split('\t').nth(3) {
        Some(field) => parse_box_field(field, line_no).map(|(_, category)| Some(category)),
        None => Ok(None),
    }
}

/// Parse one TOC line into its scene and `(box ID, category)` pairs
pub fn parse_toc_line<'a>(
    line: &'a str,
    line_no: usize,
    data_dir: &Path,
) -> Result<(Scene, Vec<(BoxId, &'a str)>)> {
    let malformed = |reason: String| ScoringError::MalformedTocLine { line_no, reason };

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 3 {
        return Err(malformed(format!(
            "expected at least 3 tab-separated fields, found {}",
            fields.len()
        )));
    }
    if fields[0].is_empty() {
        return Err(malformed("empty scene ID".to_string()));
    }

    let mut scene = Scene::new(fields[0], resolve_dir(fields[1], data_dir));
    for token in fields[2].split(';').filter(|t| !t.is_empty()) {
        let t: u32 = token
            .trim()
            .parse()
            .map_err(|_| malformed(format!("bad temporal index '{}'", token)))?;
        scene.add_temporal_index(t);
    }

    let boxes = fields[3..]
        .iter()
        .map(|&field| parse_box_field(field, line_no))
        .collect::<Result<Vec<_>>>()?;

    Ok((scene, boxes))
}

fn parse_box_field(field: &str, line_no: usize) -> Result<(BoxId, &str)> {
    let (id, category) = field.split_once(';').ok_or_else(|| ScoringError::MalformedTocLine {
        line_no,
        reason: format!("box field '{}' is not <id>;<category>", field),
    })?;
    let id: BoxId = id.trim().parse().map_err(|_| ScoringError::MalformedTocLine {
        line_no,
        reason: format!("bad box ID '{}'", id),
    })?;
    Ok((id, normalize_category(Some(category))))
}
