//! XML-RPC request encoding and response decoding.

use crate::odoo::value::Value;
use crate::utils::{escape_xml, ImportError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeMap;

pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n<methodCall><methodName>");
    out.push_str(&escape_xml(method));
    out.push_str("</methodName><params>");
    for param in params {
        out.push_str("<param>");
        param.write_xml(&mut out);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>\n");
    out
}

/// Decodes a `methodResponse`. A `<fault>` becomes [`ImportError::Fault`].
pub fn decode_response(body: &str) -> Result<Value> {
    let mut parser = ResponseParser {
        reader: Reader::from_str(body),
    };

    parser.expect_start(b"methodResponse")?;
    match parser.next_significant()? {
        Event::Start(e) if e.name().as_ref() == b"params" => {
            parser.expect_start(b"param")?;
            parser.expect_start(b"value")?;
            parser.parse_value()
        }
        Event::Start(e) if e.name().as_ref() == b"fault" => {
            parser.expect_start(b"value")?;
            let fault = parser.parse_value()?;
            Err(fault_error(&fault))
        }
        other => Err(unexpected("<params> or <fault>", &other)),
    }
}

fn fault_error(fault: &Value) -> ImportError {
    let members = fault.as_struct();
    let code = members
        .and_then(|m| m.get("faultCode"))
        .and_then(Value::as_i64)
        .unwrap_or_default();
    let message = members
        .and_then(|m| m.get("faultString"))
        .and_then(Value::as_str)
        .unwrap_or("unknown fault")
        .to_string();
    ImportError::Fault { code, message }
}

fn unexpected(expected: &str, got: &Event<'_>) -> ImportError {
    ImportError::ProtocolError(format!("expected {}, got {:?}", expected, got))
}

struct ResponseParser<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> ResponseParser<'a> {
    fn next_event(&mut self) -> Result<Event<'a>> {
        match self.reader.read_event()? {
            Event::Eof => Err(ImportError::ProtocolError(
                "unexpected end of response".to_string(),
            )),
            event => Ok(event),
        }
    }

    /// Next event that carries structure: skips the declaration, comments
    /// and whitespace between elements.
    fn next_significant(&mut self) -> Result<Event<'a>> {
        loop {
            match self.next_event()? {
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Text(t) if t.iter().all(u8::is_ascii_whitespace) => {}
                event => return Ok(event),
            }
        }
    }

    fn expect_start(&mut self, name: &[u8]) -> Result<()> {
        match self.next_significant()? {
            Event::Start(e) if e.name().as_ref() == name => Ok(()),
            other => Err(unexpected(&String::from_utf8_lossy(name), &other)),
        }
    }

    fn expect_end(&mut self, name: &[u8]) -> Result<()> {
        match self.next_significant()? {
            Event::End(e) if e.name().as_ref() == name => Ok(()),
            other => Err(unexpected(&format!("</{}>", String::from_utf8_lossy(name)), &other)),
        }
    }

    /// Text content up to the closing tag of the current element.
    fn read_text(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.next_event()? {
                Event::Text(t) => text.push_str(&t.unescape()?),
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
                Event::End(_) => return Ok(text),
                Event::Comment(_) => {}
                other => return Err(unexpected("text", &other)),
            }
        }
    }

    /// Parses the body of a `<value>` whose start tag was already consumed.
    fn parse_value(&mut self) -> Result<Value> {
        let mut untyped = String::new();
        loop {
            match self.next_event()? {
                Event::Text(t) => untyped.push_str(&t.unescape()?),
                Event::CData(c) => untyped.push_str(&String::from_utf8_lossy(&c)),
                Event::End(e) if e.name().as_ref() == b"value" => {
                    return Ok(Value::String(untyped));
                }
                Event::Start(e) => {
                    let tag = e.name().as_ref().to_vec();
                    let value = self.parse_typed(&tag)?;
                    self.expect_end(b"value")?;
                    return Ok(value);
                }
                Event::Empty(e) => {
                    let value = match e.name().as_ref() {
                        b"nil" => Value::Nil,
                        b"string" => Value::String(String::new()),
                        b"array" => Value::Array(Vec::new()),
                        b"struct" => Value::Struct(BTreeMap::new()),
                        other => {
                            return Err(ImportError::ProtocolError(format!(
                                "empty <{}> is not a valid value",
                                String::from_utf8_lossy(other)
                            )))
                        }
                    };
                    self.expect_end(b"value")?;
                    return Ok(value);
                }
                Event::Comment(_) => {}
                other => return Err(unexpected("value content", &other)),
            }
        }
    }

    fn parse_typed(&mut self, tag: &[u8]) -> Result<Value> {
        match tag {
            b"int" | b"i4" | b"i8" => {
                let text = self.read_text()?;
                text.trim()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| ImportError::ProtocolError(format!("invalid int '{}'", text)))
            }
            b"boolean" => match self.read_text()?.trim() {
                "1" => Ok(Value::Bool(true)),
                "0" => Ok(Value::Bool(false)),
                other => Err(ImportError::ProtocolError(format!(
                    "invalid boolean '{}'",
                    other
                ))),
            },
            b"double" => {
                let text = self.read_text()?;
                text.trim()
                    .parse::<f64>()
                    .map(Value::Double)
                    .map_err(|_| ImportError::ProtocolError(format!("invalid double '{}'", text)))
            }
            b"string" | b"dateTime.iso8601" | b"base64" => Ok(Value::String(self.read_text()?)),
            b"nil" => {
                self.expect_end(b"nil")?;
                Ok(Value::Nil)
            }
            b"array" => self.parse_array(),
            b"struct" => self.parse_struct(),
            other => Err(ImportError::ProtocolError(format!(
                "unsupported value type <{}>",
                String::from_utf8_lossy(other)
            ))),
        }
    }

    fn parse_array(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        match self.next_significant()? {
            Event::Empty(e) if e.name().as_ref() == b"data" => {}
            Event::Start(e) if e.name().as_ref() == b"data" => loop {
                match self.next_significant()? {
                    Event::Start(e) if e.name().as_ref() == b"value" => {
                        items.push(self.parse_value()?);
                    }
                    Event::End(e) if e.name().as_ref() == b"data" => break,
                    other => return Err(unexpected("<value> or </data>", &other)),
                }
            },
            other => return Err(unexpected("<data>", &other)),
        }
        self.expect_end(b"array")?;
        Ok(Value::Array(items))
    }

    fn parse_struct(&mut self) -> Result<Value> {
        let mut members = BTreeMap::new();
        loop {
            match self.next_significant()? {
                Event::Start(e) if e.name().as_ref() == b"member" => {
                    let (name, value) = self.parse_member()?;
                    members.insert(name, value);
                }
                Event::End(e) if e.name().as_ref() == b"struct" => break,
                other => return Err(unexpected("<member> or </struct>", &other)),
            }
        }
        Ok(Value::Struct(members))
    }

    fn parse_member(&mut self) -> Result<(String, Value)> {
        let mut name = None;
        let mut value = None;
        loop {
            match self.next_significant()? {
                Event::Start(e) if e.name().as_ref() == b"name" => {
                    name = Some(self.read_text()?);
                }
                Event::Start(e) if e.name().as_ref() == b"value" => {
                    value = Some(self.parse_value()?);
                }
                Event::End(e) if e.name().as_ref() == b"member" => break,
                other => return Err(unexpected("<name>, <value> or </member>", &other)),
            }
        }
        match (name, value) {
            (Some(name), Some(value)) => Ok((name, value)),
            _ => Err(ImportError::ProtocolError(
                "struct member without name or value".to_string(),
            )),
        }
    }
}
