use crate::core::attributes::{AttributeRef, DateAttribute, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::utils::file_parsing::{split_csv_preserving_quotes, strip_surrounding_quotes};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Error, ErrorKind, Seek};
use std::sync::Arc;

#[derive(Debug)]
pub(super) enum AttributeKind {
    Numeric,
    Nominal(Vec<String>),
    Date(Option<String>),
}

pub(super) fn is_comment_or_empty(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.starts_with('%')
}

/// Reads the header up to and including `@data` and returns it with the
/// byte offset of the first data line. `class_index` is 0-based; `None`
/// selects the last attribute.
pub(super) fn parse_header(
    reader: &mut BufReader<File>,
    class_index: Option<usize>,
) -> Result<(InstanceHeader, u64), Error> {
    let mut relation: Option<String> = None;
    let mut attributes: Vec<AttributeRef> = Vec::new();
    let mut line = String::new();
    let mut pending_line: Option<String> = None;

    loop {
        line.clear();
        let n = reader.read_line(&mut line)?;
        if n == 0 {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                "ARFF file ended before @data",
            ));
        }
        if is_comment_or_empty(&line) {
            continue;
        }

        let low = line.to_lowercase();
        if low.starts_with("@relation") {
            let raw = line.trim()[9..].trim();
            let rel = strip_surrounding_quotes(raw).to_string();
            relation = Some(rel);
            break;
        } else if low.starts_with("@attribute") || low.starts_with("@data") {
            pending_line = Some(line.clone());
            break;
        }
    }

    let data_start_pos: u64;
    loop {
        if let Some(pending) = pending_line.take() {
            line = pending;
        } else {
            line.clear();
            let n = reader.read_line(&mut line)?;
            if n == 0 {
                return Err(Error::new(
                    ErrorKind::UnexpectedEof,
                    "ARFF file ended before @data",
                ));
            }
        }

        if is_comment_or_empty(&line) {
            continue;
        }

        let low = line.to_lowercase();
        if low.starts_with("@attribute") {
            let (name, kind) = parse_attribute_line(&line)?;
            match kind {
                AttributeKind::Numeric => {
                    let attribute = NumericAttribute::new(name);
                    attributes.push(Arc::new(attribute) as AttributeRef);
                }
                AttributeKind::Nominal(values) => {
                    let mut map = HashMap::new();
                    for (i, v) in values.iter().enumerate() {
                        map.insert(v.clone(), i);
                    }
                    let attribute = NominalAttribute::with_values(name, values, map);
                    attributes.push(Arc::new(attribute) as AttributeRef);
                }
                AttributeKind::Date(format) => {
                    let attribute = DateAttribute::new(name, format);
                    attributes.push(Arc::new(attribute) as AttributeRef);
                }
            }
        } else if low.starts_with("@data") {
            data_start_pos = reader.stream_position()?;
            break;
        } else {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("Unsupported header directive: {}", line.trim()),
            ));
        }
    }

    let class_index = resolve_class_index(class_index, attributes.len())?;
    let header = InstanceHeader::new(
        relation.unwrap_or_else(|| "unnamed_relation".to_string()),
        attributes,
        class_index,
    );

    Ok((header, data_start_pos))
}

fn resolve_class_index(requested: Option<usize>, n_attributes: usize) -> Result<usize, Error> {
    if n_attributes == 0 {
        return Err(Error::new(
            ErrorKind::InvalidData,
            "ARFF header declares no attributes",
        ));
    }
    match requested {
        None => Ok(n_attributes - 1),
        Some(i) if i < n_attributes => Ok(i),
        Some(i) => Err(Error::new(
            ErrorKind::InvalidInput,
            format!(
                "class index {} out of range for {n_attributes} attributes",
                i + 1
            ),
        )),
    }
}

pub(super) fn parse_attribute_line(line: &str) -> Result<(String, AttributeKind), Error> {
    let rest = {
        let mut l = line.trim();
        let low = l.to_ascii_lowercase();
        if !low.starts_with("@attribute") {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "Line is not '@attribute'",
            ));
        }
        if let Some(idx) = low.find("@attribute") {
            l = &l[idx + "@attribute".len()..];
        }
        l.trim()
    };

    let (name, after_name) = if let Some(quote) = rest.chars().next().filter(|c| matches!(c, '\'' | '"')) {
        let mut end = None;
        for (i, c) in rest.char_indices().skip(1) {
            if c == quote {
                end = Some(i);
                break;
            }
        }
        let end = end.ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidData,
                "Attribute name without closing quote marks",
            )
        })?;
        let name = rest[1..end].to_string();
        (name, rest[end + 1..].trim())
    } else {
        let (name, after) = rest
            .split_once(char::is_whitespace)
            .ok_or_else(|| Error::new(ErrorKind::InvalidData, "Attribute type is missing"))?;
        (name.to_string(), after.trim())
    };

    let low = after_name.to_ascii_lowercase();
    if low.starts_with("numeric") || low.starts_with("real") || low.starts_with("integer") {
        return Ok((name, AttributeKind::Numeric));
    }

    if low.starts_with("date") {
        let format = strip_surrounding_quotes(&after_name["date".len()..]);
        let format = (!format.is_empty()).then(|| format.to_string());
        return Ok((name, AttributeKind::Date(format)));
    }

    let after_name = after_name.trim();
    if after_name.starts_with('{') {
        let close = after_name
            .rfind('}')
            .ok_or_else(|| Error::new(ErrorKind::InvalidData, "Nominal set without closing '}'"))?;

        let inside = &after_name[1..close];
        let values = inside
            .split(',')
            .map(|s| strip_surrounding_quotes(s.trim()).to_string())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect::<Vec<_>>();

        if values.is_empty() {
            return Err(Error::new(ErrorKind::InvalidData, "Empty nominal domain"));
        }

        return Ok((name, AttributeKind::Nominal(values)));
    }

    Err(Error::new(
        ErrorKind::InvalidData,
        format!("Attribute kind not supported: {after_name}"),
    ))
}

pub(super) fn parse_instance_values(
    header: &InstanceHeader,
    line: &str,
) -> Result<Vec<f64>, Error> {
    let tokens = split_csv_preserving_quotes(line);
    if tokens.len() != header.attributes.len() {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!(
                "Number of columns ({}) differs from number of attributes ({})",
                tokens.len(),
                header.attributes.len()
            ),
        ));
    }

    let mut values = Vec::with_capacity(tokens.len());
    for (idx, raw) in tokens.into_iter().enumerate() {
        let raw = raw.trim();
        if raw == "?" {
            values.push(f64::NAN);
            continue;
        }

        let attr = &header.attributes[idx];

        if attr.as_any().is::<NumericAttribute>() {
            let v: f64 = raw.parse().map_err(|_| {
                Error::new(
                    ErrorKind::InvalidData,
                    format!("Invalid numeric value '{raw}' for attribute #{idx}"),
                )
            })?;
            values.push(v);
            continue;
        }

        if let Some(date) = attr.as_any().downcast_ref::<DateAttribute>() {
            values.push(date.parse_date(strip_surrounding_quotes(raw))?);
            continue;
        }

        if let Some(nominal) = attr.as_any().downcast_ref::<NominalAttribute>() {
            let key = strip_surrounding_quotes(raw);
            let Some(&pos) = nominal.label_to_index.get(key) else {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    format!("Nominal value '{key}' not found in domain of attribute #{idx}"),
                ));
            };
            values.push(pos as f64);
            continue;
        }

        return Err(Error::new(
            ErrorKind::InvalidData,
            format!("Unsupported attribute type at column #{idx}"),
        ));
    }

    Ok(values)
}
