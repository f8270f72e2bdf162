//! Content stream interpreter.
//!
//! Walks tokenized operators, maintains the graphics and text state, and
//! reports every shown glyph to a [`ContentHandler`]. Form XObjects invoked
//! through `Do` are interpreted recursively with their own resources.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Stream};
use pdftext_core::{Ctm, ExtractOptions, ExtractWarning, ExtractWarningCode};

use crate::error::BackendError;
use crate::font::{LoadedFont, font_dictionary};
use crate::handler::{CharEvent, ContentHandler};
use crate::objects::{get, get_array, get_dict, get_name, numbers, stream_bytes};
use crate::text_renderer::{
    RawChar, TjElement, double_quote_show_string, quote_show_string, show_positioned, show_string,
};
use crate::text_state::{TextParams, TextState};
use crate::tokenizer::{Operand, tokenize};

/// Graphics state that survives across nested content streams: the CTM and
/// the `q`/`Q` stack.
#[derive(Debug, Clone, Default)]
pub struct InterpreterState {
    ctm: Ctm,
    stack: Vec<(Ctm, TextParams)>,
}

impl InterpreterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ctm(&self) -> &Ctm {
        &self.ctm
    }

    /// `cm`: the new matrix applies before the current CTM.
    pub fn concat_matrix(&mut self, m: &Ctm) {
        self.ctm = m.concat(&self.ctm);
    }

    /// `q`
    pub fn save(&mut self, text: &TextParams) {
        self.stack.push((self.ctm, text.clone()));
    }

    /// `Q`. An unbalanced `Q` is ignored.
    pub fn restore(&mut self) -> Option<TextParams> {
        let (ctm, text) = self.stack.pop()?;
        self.ctm = ctm;
        Some(text)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Interpret one content stream.
///
/// `depth` is 0 for the page itself and grows by one per nested Form
/// XObject. Forms nested deeper than `options.max_recursion_depth` are
/// skipped with a warning.
///
/// # Errors
///
/// Fails only when the content stream cannot be tokenized. Missing fonts,
/// missing XObjects and similar problems are reported as warnings.
#[allow(clippy::too_many_arguments)]
pub fn interpret_content_stream(
    doc: &Document,
    content: &[u8],
    resources: &Dictionary,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
    depth: usize,
    gstate: &mut InterpreterState,
    tstate: &mut TextState,
) -> Result<(), BackendError> {
    interpret_stream(
        doc,
        content,
        resources,
        handler,
        options,
        depth,
        gstate,
        tstate,
        None,
    )
}

/// `inherited_font` is the font selected by the stream that invoked this
/// one. It stays current until the stream issues its own `Tf`.
#[allow(clippy::too_many_arguments)]
fn interpret_stream(
    doc: &Document,
    content: &[u8],
    resources: &Dictionary,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
    depth: usize,
    gstate: &mut InterpreterState,
    tstate: &mut TextState,
    inherited_font: Option<&LoadedFont>,
) -> Result<(), BackendError> {
    let operators = tokenize(content)?;
    let mut fonts: HashMap<String, LoadedFont> = HashMap::new();
    let mut ctx = Context {
        doc,
        resources,
        options,
        handler,
    };
    tracing::trace!(depth, operators = operators.len(), "interpreting content stream");

    for (op_index, op) in operators.iter().enumerate() {
        let operands = &op.operands;
        match op.name.as_str() {
            "q" => gstate.save(&tstate.params),
            "Q" => {
                if let Some(params) = gstate.restore() {
                    tstate.params = params;
                }
            }
            "cm" => {
                if let Some(m) = matrix_operand(operands) {
                    gstate.concat_matrix(&m);
                }
            }

            "BT" => tstate.begin_text(),
            "ET" => tstate.end_text(),
            "Tf" => {
                if let (Some(name), Some(size)) = (
                    operands.first().and_then(Operand::as_name),
                    operands.get(1).and_then(Operand::as_f64),
                ) {
                    tstate.params.font_name = name.to_string();
                    tstate.params.font_size = size;
                    if !fonts.contains_key(name) {
                        let font = ctx.load_font(name, op_index);
                        fonts.insert(name.to_string(), font);
                    }
                }
            }
            "Tc" => {
                if let Some(v) = number_at(operands, 0) {
                    tstate.params.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = number_at(operands, 0) {
                    tstate.params.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = number_at(operands, 0) {
                    tstate.params.h_scaling = v;
                }
            }
            "TL" => {
                if let Some(v) = number_at(operands, 0) {
                    tstate.params.leading = v;
                }
            }
            "Ts" => {
                if let Some(v) = number_at(operands, 0) {
                    tstate.params.rise = v;
                }
            }
            "Tr" => {
                if let Some(v) = number_at(operands, 0) {
                    tstate.params.render_mode = v as i64;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (number_at(operands, 0), number_at(operands, 1)) {
                    tstate.move_text_position(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (number_at(operands, 0), number_at(operands, 1)) {
                    tstate.move_text_position_and_set_leading(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = matrix_operand(operands) {
                    tstate.set_text_matrix(m);
                }
            }
            "T*" => tstate.move_to_next_line(),

            "Tj" | "'" | "\"" | "TJ" => {
                let font = current_font(&mut fonts, inherited_font, tstate);
                let get_width = |code: u32| font.width(code);
                let raw = match op.name.as_str() {
                    "Tj" => string_at(operands, 0)
                        .map(|s| show_string(tstate, s, font.code_width, &get_width)),
                    "'" => string_at(operands, 0)
                        .map(|s| quote_show_string(tstate, s, font.code_width, &get_width)),
                    "\"" => match (number_at(operands, 0), number_at(operands, 1)) {
                        (Some(aw), Some(ac)) => string_at(operands, 2).map(|s| {
                            double_quote_show_string(
                                tstate,
                                aw,
                                ac,
                                s,
                                font.code_width,
                                &get_width,
                            )
                        }),
                        _ => None,
                    },
                    _ => operands.first().and_then(tj_elements).map(|elements| {
                        show_positioned(tstate, &elements, font.code_width, &get_width)
                    }),
                };
                if let Some(raw) = raw {
                    emit_chars(ctx.handler, raw, font, tstate, gstate.ctm());
                }
            }

            "Do" => {
                if let Some(name) = operands.first().and_then(Operand::as_name) {
                    let active = fonts.get(&tstate.params.font_name).or(inherited_font);
                    ctx.invoke_xobject(name, op_index, depth, active, gstate, tstate)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

struct Context<'a, 'h> {
    doc: &'a Document,
    resources: &'a Dictionary,
    options: &'a ExtractOptions,
    handler: &'h mut dyn ContentHandler,
}

impl Context<'_, '_> {
    fn warn(&mut self, warning: ExtractWarning) {
        tracing::warn!(code = %warning.code, "{}", warning.description);
        if self.options.collect_warnings {
            self.handler.on_warning(warning);
        }
    }

    fn load_font(&mut self, name: &str, op_index: usize) -> LoadedFont {
        match font_dictionary(self.doc, self.resources, name) {
            Some(dict) => {
                let (font, warnings) = LoadedFont::load(self.doc, dict, name);
                for w in warnings {
                    self.warn(ExtractWarning {
                        operator_index: Some(op_index),
                        font_name: Some(name.to_string()),
                        ..w
                    });
                }
                tracing::debug!(resource = name, font = %font.name, "loaded font");
                font
            }
            None => {
                self.warn(ExtractWarning::with_operator_context(
                    ExtractWarningCode::MissingFont,
                    "font not found in resources, using default metrics",
                    op_index,
                    name,
                ));
                LoadedFont::fallback(name)
            }
        }
    }

    fn invoke_xobject(
        &mut self,
        name: &str,
        op_index: usize,
        depth: usize,
        active_font: Option<&LoadedFont>,
        gstate: &mut InterpreterState,
        tstate: &mut TextState,
    ) -> Result<(), BackendError> {
        let doc = self.doc;
        let stream = get_dict(doc, self.resources, b"XObject")
            .and_then(|xobjects| get(doc, xobjects, name.as_bytes()))
            .and_then(|o| o.as_stream().ok());
        let Some(stream) = stream else {
            self.warn(ExtractWarning {
                operator_index: Some(op_index),
                ..ExtractWarning::with_code(
                    ExtractWarningCode::MalformedObject,
                    format!("XObject /{name} not found in resources"),
                )
            });
            return Ok(());
        };
        if get_name(doc, &stream.dict, b"Subtype") != Some(b"Form".as_slice()) {
            // images and PostScript XObjects carry no text
            return Ok(());
        }
        if depth >= self.options.max_recursion_depth {
            self.warn(ExtractWarning {
                operator_index: Some(op_index),
                ..ExtractWarning::with_code(
                    ExtractWarningCode::ResourceLimitReached,
                    format!(
                        "Form XObject /{name} nested deeper than {} levels, skipped",
                        self.options.max_recursion_depth
                    ),
                )
            });
            return Ok(());
        }
        self.run_form(stream, depth, active_font, gstate, tstate)
    }

    fn run_form(
        &mut self,
        stream: &Stream,
        depth: usize,
        active_font: Option<&LoadedFont>,
        gstate: &mut InterpreterState,
        tstate: &mut TextState,
    ) -> Result<(), BackendError> {
        let doc = self.doc;
        let content = stream_bytes(stream)?;
        let resources = get_dict(doc, &stream.dict, b"Resources").unwrap_or(self.resources);

        gstate.save(&tstate.params);
        if let Some(m) = get_array(doc, &stream.dict, b"Matrix")
            .map(|arr| numbers(doc, arr))
            .filter(|v| v.len() == 6)
        {
            gstate.concat_matrix(&Ctm::new(m[0], m[1], m[2], m[3], m[4], m[5]));
        }
        let saved_text = tstate.clone();
        let result = interpret_stream(
            doc,
            &content,
            resources,
            &mut *self.handler,
            self.options,
            depth + 1,
            gstate,
            tstate,
            active_font,
        );
        *tstate = saved_text;
        if let Some(params) = gstate.restore() {
            tstate.params = params;
        }
        result
    }
}

/// Font for the current `Tf` resource. Before this stream's own `Tf` the
/// font inherited from the invoking stream applies; with neither, default
/// metrics are used.
fn current_font<'f>(
    fonts: &'f mut HashMap<String, LoadedFont>,
    inherited: Option<&'f LoadedFont>,
    tstate: &TextState,
) -> &'f LoadedFont {
    let name = &tstate.params.font_name;
    if !fonts.contains_key(name) {
        if let Some(font) = inherited {
            return font;
        }
    }
    fonts
        .entry(name.clone())
        .or_insert_with(|| LoadedFont::fallback(name))
}

fn emit_chars(
    handler: &mut dyn ContentHandler,
    raw: Vec<RawChar>,
    font: &LoadedFont,
    tstate: &TextState,
    ctm: &Ctm,
) {
    let params = &tstate.params;
    // Boxes span the font size: the bottom sits at the descent and the top
    // one em above it.
    let descent = font.metrics.descent();
    let ascent = 1000.0 + descent;
    let ctm = ctm.to_array();

    for rc in raw {
        handler.on_char(CharEvent {
            char_code: rc.char_code,
            unicode: font.unicode(rc.char_code),
            font_name: font.name.clone(),
            font_size: params.font_size,
            text_matrix: rc.text_matrix,
            ctm,
            displacement: rc.width,
            h_scaling: tstate.h_scaling_normalized(),
            rise: params.rise,
            ascent,
            descent,
        });
    }
}

fn number_at(operands: &[Operand], index: usize) -> Option<f64> {
    operands.get(index).and_then(Operand::as_f64)
}

fn string_at(operands: &[Operand], index: usize) -> Option<&[u8]> {
    operands.get(index).and_then(Operand::as_bytes)
}

fn matrix_operand(operands: &[Operand]) -> Option<Ctm> {
    let v: Vec<f64> = operands.iter().filter_map(Operand::as_f64).collect();
    match v.as_slice() {
        [a, b, c, d, e, f] => Some(Ctm::new(*a, *b, *c, *d, *e, *f)),
        _ => None,
    }
}

fn tj_elements(operand: &Operand) -> Option<Vec<TjElement>> {
    let Operand::Array(items) = operand else {
        return None;
    };
    Some(
        items
            .iter()
            .filter_map(|item| match item {
                Operand::LiteralString(b) | Operand::HexString(b) => {
                    Some(TjElement::String(b.clone()))
                }
                other => other.as_f64().map(TjElement::Adjustment),
            })
            .collect(),
    )
}
