/*
[INPUT]:  Envelope mappings (outbound) and raw response bodies (inbound)
[OUTPUT]: OPS envelope XML documents and parsed response mappings
[POS]:    Codec layer - pluggable XML serialization capability
[UPDATE]: When changing the XML dialect or adding codec implementations
*/

use crate::value::{Assoc, Value};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::fmt::Debug;
use thiserror::Error;

const PROLOGUE: &str = "<?xml version='1.0' encoding='UTF-8' standalone='no' ?>\n\
<!DOCTYPE OPS_envelope SYSTEM 'ops.dtd'>\n";
const OPS_VERSION: &str = "0.9";

/// Errors raised by an [`XmlCodec`]; the client passes them through untouched
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("failed to serialize request: {0}")]
    Serialize(String),

    #[error("failed to parse response XML: {0}")]
    Parse(String),
}

/// Serialization capability backing every request and response
///
/// Implementations are selected when the client is built, so call sites do
/// not change when the dialect does.
pub trait XmlCodec: Send + Sync + Debug {
    /// Serialize a mapping into a complete XML document
    fn build(&self, data: &Assoc) -> Result<String, CodecError>;

    /// Parse a response document back into a mapping
    fn parse(&self, xml: &str) -> Result<Assoc, CodecError>;
}

/// OPS envelope codec (`OPS_envelope` / `data_block` / `dt_assoc`)
#[derive(Debug, Clone, Copy, Default)]
pub struct OpsXmlCodec;

impl XmlCodec for OpsXmlCodec {
    fn build(&self, data: &Assoc) -> Result<String, CodecError> {
        let mut writer = Writer::new_with_indent(PROLOGUE.as_bytes().to_vec(), b' ', 2);

        start(&mut writer, BytesStart::new("OPS_envelope"))?;
        start(&mut writer, BytesStart::new("header"))?;
        start(&mut writer, BytesStart::new("version"))?;
        text(&mut writer, OPS_VERSION)?;
        end(&mut writer, "version")?;
        end(&mut writer, "header")?;
        start(&mut writer, BytesStart::new("body"))?;
        start(&mut writer, BytesStart::new("data_block"))?;
        write_assoc(&mut writer, data)?;
        end(&mut writer, "data_block")?;
        end(&mut writer, "body")?;
        end(&mut writer, "OPS_envelope")?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(|err| CodecError::Serialize(err.to_string()))
    }

    fn parse(&self, xml: &str) -> Result<Assoc, CodecError> {
        let root = read_tree(xml)?;
        let data_block = root
            .find("data_block")
            .ok_or_else(|| CodecError::Parse("missing data_block element".to_string()))?;
        let container = data_block
            .children
            .first()
            .ok_or_else(|| CodecError::Parse("empty data_block element".to_string()))?;

        match container_value(container)? {
            Value::Assoc(assoc) => Ok(assoc),
            _ => Err(CodecError::Parse(format!(
                "expected dt_assoc at top level, found {}",
                container.name
            ))),
        }
    }
}

type XmlWriter = Writer<Vec<u8>>;

fn start(writer: &mut XmlWriter, element: BytesStart<'_>) -> Result<(), CodecError> {
    writer
        .write_event(Event::Start(element))
        .map_err(|err| CodecError::Serialize(err.to_string()))
}

fn end(writer: &mut XmlWriter, name: &str) -> Result<(), CodecError> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|err| CodecError::Serialize(err.to_string()))
}

fn text(writer: &mut XmlWriter, content: &str) -> Result<(), CodecError> {
    if content.is_empty() {
        return Ok(());
    }
    writer
        .write_event(Event::Text(BytesText::new(content)))
        .map_err(|err| CodecError::Serialize(err.to_string()))
}

fn write_assoc(writer: &mut XmlWriter, assoc: &Assoc) -> Result<(), CodecError> {
    start(writer, BytesStart::new("dt_assoc"))?;
    for (key, value) in assoc {
        write_item(writer, key, value)?;
    }
    end(writer, "dt_assoc")
}

fn write_array(writer: &mut XmlWriter, items: &[Value]) -> Result<(), CodecError> {
    start(writer, BytesStart::new("dt_array"))?;
    for (index, value) in items.iter().enumerate() {
        write_item(writer, &index.to_string(), value)?;
    }
    end(writer, "dt_array")
}

fn write_item(writer: &mut XmlWriter, key: &str, value: &Value) -> Result<(), CodecError> {
    let element = BytesStart::new("item").with_attributes([("key", key)]);
    if value.as_str() == Some("") {
        // a closing tag on its own line would carry indentation into the value
        return writer
            .write_event(Event::Empty(element))
            .map_err(|err| CodecError::Serialize(err.to_string()));
    }

    start(writer, element)?;
    match value {
        Value::Text(content) => text(writer, content)?,
        Value::Assoc(assoc) => write_assoc(writer, assoc)?,
        Value::Array(items) => write_array(writer, items)?,
    }
    end(writer, "item")
}

/// Minimal element tree produced while reading a response
#[derive(Debug, Default)]
struct Node {
    name: String,
    key: Option<String>,
    text: String,
    children: Vec<Node>,
}

impl Node {
    fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

fn parse_error(err: impl std::fmt::Display) -> CodecError {
    CodecError::Parse(err.to_string())
}

fn open_node(element: &BytesStart<'_>) -> Result<Node, CodecError> {
    let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
    let key = match element.try_get_attribute("key").map_err(parse_error)? {
        Some(attribute) => Some(attribute.unescape_value().map_err(parse_error)?.into_owned()),
        None => None,
    };
    Ok(Node {
        name,
        key,
        ..Node::default()
    })
}

fn read_tree(xml: &str) -> Result<Node, CodecError> {
    // Text is kept verbatim; whitespace between containers only lands on
    // container nodes, whose text is never read.
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Start(element) => stack.push(open_node(&element)?),
            Event::Empty(element) => {
                let node = open_node(&element)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root = Some(node),
                }
            }
            Event::Text(content) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&content.unescape().map_err(parse_error)?);
                }
            }
            Event::CData(content) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&content.into_inner()));
                }
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| parse_error("unbalanced closing tag"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root = Some(node),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(parse_error("unexpected end of document"));
    }
    root.ok_or_else(|| parse_error("document has no root element"))
}

fn container_value(node: &Node) -> Result<Value, CodecError> {
    match node.name.as_str() {
        "dt_assoc" => {
            let mut assoc = Assoc::new();
            for item in items(node) {
                let key = item
                    .key
                    .clone()
                    .ok_or_else(|| parse_error("dt_assoc item without key attribute"))?;
                assoc.insert(key, item_value(item)?);
            }
            Ok(Value::Assoc(assoc))
        }
        "dt_array" => {
            let mut indexed = Vec::new();
            for (position, item) in items(node).enumerate() {
                let index = item
                    .key
                    .as_deref()
                    .and_then(|key| key.parse::<usize>().ok())
                    .unwrap_or(position);
                indexed.push((index, item_value(item)?));
            }
            indexed.sort_by_key(|(index, _)| *index);
            Ok(Value::Array(indexed.into_iter().map(|(_, value)| value).collect()))
        }
        "dt_scalar" | "dt_scalarref" => Ok(Value::Text(node.text.clone())),
        other => Err(CodecError::Parse(format!("unexpected element <{other}>"))),
    }
}

fn items(node: &Node) -> impl Iterator<Item = &Node> {
    node.children.iter().filter(|child| child.name == "item")
}

fn item_value(item: &Node) -> Result<Value, CodecError> {
    match item.children.first() {
        Some(container) => container_value(container),
        None => Ok(Value::Text(item.text.clone())),
    }
}
