//! Translation between zone records and DNS Made Easy record rows

use dme_sync_core::{CaaValue, MxValue, Record, RecordData, RecordType, SrvValue};

use crate::error::{ProviderError, Result};

use super::{PROVIDER_NAME, RecordParams, RemoteRecord};

fn missing_field(row: &RemoteRecord, field: &str) -> ProviderError {
    ProviderError::ParseError {
        provider: PROVIDER_NAME.to_string(),
        detail: format!(
            "{} record {} ({}) missing {field}",
            row.record_type, row.id, row.name
        ),
    }
}

fn require<T: Copy>(value: Option<T>, row: &RemoteRecord, field: &str) -> Result<T> {
    value.ok_or_else(|| missing_field(row, field))
}

/// Drops the first and last character: the API quotes CAA values.
fn strip_outer(value: &str) -> String {
    let mut chars = value.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}

/// TXT value as stored by the API to zone form.
///
/// `;` gets escaped, and every `""` not preceded by a backslash is removed:
/// the API splits long values into 255-character chunks joined that way.
pub(crate) fn txt_from_wire(value: &str) -> String {
    let escaped: Vec<char> = value.replace(';', "\\;").chars().collect();
    let mut out = String::with_capacity(escaped.len());
    let mut i = 0;
    while i < escaped.len() {
        let is_delimiter = escaped[i] == '"'
            && escaped.get(i + 1) == Some(&'"')
            && (i == 0 || escaped[i - 1] != '\\');
        if is_delimiter {
            i += 2;
        } else {
            out.push(escaped[i]);
            i += 1;
        }
    }
    out
}

/// TXT value in zone form to what the API accepts: unescaped and quoted.
/// Chunking is left to the API.
pub(crate) fn txt_to_wire(value: &str) -> String {
    format!("\"{}\"", value.replace("\\;", ";"))
}

/// Builds one record from the rows sharing its name and type.
///
/// `rows` must not be empty; the TTL comes from the first row.
pub(crate) fn record_from_rows(
    name: &str,
    record_type: RecordType,
    rows: &[&RemoteRecord],
) -> Result<Record> {
    let Some(first) = rows.first() else {
        return Err(ProviderError::ParseError {
            provider: PROVIDER_NAME.to_string(),
            detail: format!("no rows for {record_type} record '{name}'"),
        });
    };
    let values = || rows.iter().map(|r| r.value.clone()).collect::<Vec<_>>();

    let data = match record_type {
        RecordType::A => RecordData::A(values()),
        RecordType::Aaaa => RecordData::Aaaa(values()),
        RecordType::Ns => RecordData::Ns(values()),
        RecordType::Alias => RecordData::Alias(first.value.clone()),
        RecordType::Cname => RecordData::Cname(first.value.clone()),
        RecordType::Ptr => RecordData::Ptr(first.value.clone()),
        RecordType::Caa => RecordData::Caa(
            rows.iter()
                .map(|r| {
                    Ok(CaaValue {
                        flags: require(r.issuer_critical, r, "issuerCritical")?,
                        tag: r
                            .caa_type
                            .clone()
                            .ok_or_else(|| missing_field(r, "caaType"))?,
                        value: strip_outer(&r.value),
                    })
                })
                .collect::<Result<_>>()?,
        ),
        RecordType::Mx => RecordData::Mx(
            rows.iter()
                .map(|r| {
                    Ok(MxValue {
                        preference: require(r.mx_level, r, "mxLevel")?,
                        exchange: r.value.clone(),
                    })
                })
                .collect::<Result<_>>()?,
        ),
        RecordType::Srv => RecordData::Srv(
            rows.iter()
                .map(|r| {
                    Ok(SrvValue {
                        priority: require(r.priority, r, "priority")?,
                        weight: require(r.weight, r, "weight")?,
                        port: require(r.port, r, "port")?,
                        target: r.value.clone(),
                    })
                })
                .collect::<Result<_>>()?,
        ),
        RecordType::Txt => RecordData::Txt(rows.iter().map(|r| txt_from_wire(&r.value)).collect()),
    };

    Ok(Record::new(name, first.ttl, data))
}

/// Expands a record into the rows to create, one per value.
pub(crate) fn params_for(record: &Record) -> Vec<RecordParams> {
    let row = |value: &str| {
        RecordParams::new(
            record.name.as_str(),
            record.record_type().as_str(),
            value,
            record.ttl,
        )
    };

    match &record.data {
        RecordData::A(values) | RecordData::Aaaa(values) | RecordData::Ns(values) => {
            values.iter().map(|v| row(v)).collect()
        }
        RecordData::Alias(value) | RecordData::Cname(value) | RecordData::Ptr(value) => {
            vec![row(value)]
        }
        RecordData::Mx(values) => values
            .iter()
            .map(|v| RecordParams {
                mx_level: Some(v.preference),
                ..row(&v.exchange)
            })
            .collect(),
        RecordData::Srv(values) => values
            .iter()
            .map(|v| RecordParams {
                priority: Some(v.priority),
                weight: Some(v.weight),
                port: Some(v.port),
                ..row(&v.target)
            })
            .collect(),
        RecordData::Txt(values) => values.iter().map(|v| row(&txt_to_wire(v))).collect(),
        // CAA values go out unquoted; the API adds the quotes.
        RecordData::Caa(values) => values
            .iter()
            .map(|v| RecordParams {
                issuer_critical: Some(v.flags),
                caa_type: Some(v.tag.clone()),
                ..row(&v.value)
            })
            .collect(),
    }
}
