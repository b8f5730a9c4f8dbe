//! Canonical markup output for a [`Context`].

use crate::Context;
use palaver_error::{ContextError, ContextErrorKind};
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};

impl Context {
    /// Writes the document as canonical markup that parses back to an equal `Context`.
    ///
    /// ```
    /// use palaver_context::Context;
    ///
    /// let original: Context = r#"<context>
    ///   <variable name="n" type="number" value="3"/>
    ///   <stage key="A" blocks="a, b"/>
    ///   <block key="a">one {{n}}</block>
    /// </context>"#
    ///     .parse()
    ///     .expect("valid document");
    ///
    /// let markup = original.to_markup().expect("writable");
    /// let reparsed: Context = markup.parse().expect("reparse");
    /// assert_eq!(original, reparsed);
    /// ```
    pub fn to_markup(&self) -> Result<String, ContextError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        write_document(&mut writer, self).map_err(|e| {
            ContextError::new(ContextErrorKind::Xml(format!("Failed to write markup: {}", e)))
        })?;
        String::from_utf8(writer.into_inner())
            .map_err(|e| ContextError::new(ContextErrorKind::Xml(e.to_string())))
    }
}

fn write_document(
    writer: &mut Writer<Vec<u8>>,
    context: &Context,
) -> Result<(), Box<dyn std::error::Error>> {
    writer.write_event(Event::Start(BytesStart::new("context")))?;

    writer.write_event(Event::Start(BytesStart::new("info")))?;
    for (name, text) in [
        ("version", &context.version),
        ("date", &context.date),
        ("description", &context.description),
    ] {
        writer.write_event(Event::Start(BytesStart::new(name)))?;
        writer.write_event(Event::Text(BytesText::new(text)))?;
        writer.write_event(Event::End(BytesEnd::new(name)))?;
    }
    writer.write_event(Event::End(BytesEnd::new("info")))?;

    for variable in &context.variables {
        let value = variable.value.raw();
        let element = BytesStart::new("variable").with_attributes([
            ("name", variable.name.as_str()),
            ("type", variable.var_type().as_ref()),
            ("value", value.as_str()),
        ]);
        writer.write_event(Event::Empty(element))?;
    }

    for stage in &context.stages {
        let blocks = stage.block_keys.join(", ");
        let element = BytesStart::new("stage").with_attributes([
            ("key", stage.key.as_str()),
            ("description", stage.description.as_str()),
            ("blocks", blocks.as_str()),
            ("enabled", if stage.enabled { "true" } else { "false" }),
        ]);
        writer.write_event(Event::Empty(element))?;
    }

    for block in &context.blocks {
        writer.write_event(Event::Start(
            BytesStart::new("block").with_attributes([("key", block.key.as_str())]),
        ))?;
        // A CDATA section cannot contain its own terminator.
        if block.content.contains("]]>") {
            writer.write_event(Event::Text(BytesText::new(&block.content)))?;
        } else {
            writer.write_event(Event::CData(BytesCData::new(block.content.as_str())))?;
        }
        writer.write_event(Event::End(BytesEnd::new("block")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("context")))?;
    Ok(())
}
