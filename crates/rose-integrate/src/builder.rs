//! Turns parsed segments into positioned items.
//!
//! The builder walks the segments of a source string in order and feeds a
//! [`LayoutState`]. Text is decoded through its escapes character by
//! character so every item knows exactly which source bytes it covers.

use std::ops::Range;

use rose_common::warning::warn_once;
use rose_markup::escape::{EscapedChar, EscapedChars};
use rose_markup::{Color, Segment, Tag, TextSpan, split_segments};

use crate::config::IntegrateConfig;
use crate::geometry::Rect;
use crate::item::{ANIMATION_PREFIX, Align, BOX_WIDTH, Content, Item};
use crate::layout::LayoutState;
use crate::linebreak;
use crate::metrics::TextStyle;
use crate::resources::Environment;

/// Presentation and source bookkeeping shared by every item of one text run.
#[derive(Debug, Clone)]
struct TextRun {
    /// Span of the enclosing tag; `None` for plain text.
    tag: Option<Range<usize>>,
    value_span: Option<Range<usize>>,
    quote_require_escape: bool,
    atomic: bool,
    font_size: u32,
    style: TextStyle,
    color: Color,
    ref_to: Option<String>,
}

/// One layout pass over a source string.
pub struct RunBuilder<'a> {
    src: &'a str,
    config: &'a IntegrateConfig,
    env: &'a Environment,
    layout: LayoutState,
}

impl<'a> RunBuilder<'a> {
    /// Prepare a pass. `min_row_height` is the line height of the default font.
    #[must_use]
    pub const fn new(
        src: &'a str,
        config: &'a IntegrateConfig,
        env: &'a Environment,
        min_row_height: i32,
    ) -> Self {
        Self {
            src,
            config,
            env,
            layout: LayoutState::new(
                config.max_width,
                min_row_height,
                config.align_bottom,
                config.float_gap,
            ),
        }
    }

    /// Lay out every segment and return the items in document order.
    #[must_use]
    pub fn build(mut self) -> Vec<Item> {
        for segment in split_segments(self.src) {
            match segment {
                Segment::Text(span) => self.handle_text(&span),
                Segment::Ref(tag) => self.handle_ref(&tag),
                Segment::Img(tag) => self.handle_img(&tag),
                Segment::Jump(tag) => self.handle_jump(&tag),
                Segment::Format(tag) => self.handle_format(&tag),
            }
        }

        // The position after a final line feed must stay addressable.
        if self.layout.items().last().is_some_and(Item::is_line_feed) {
            let end = self.src.len();
            let run = self.plain_run();
            let spacer = self.spacer_item(&run, end, 0, 0);
            let _ = self.layout.add_item(spacer);
        }
        self.layout.down_one_line();

        let items = self.layout.into_items();
        tracing::debug!(
            target: "integrate.layout",
            items = items.len(),
            src_len = self.src.len(),
            "layout finished"
        );
        items
    }

    fn plain_run(&self) -> TextRun {
        TextRun {
            tag: None,
            value_span: None,
            quote_require_escape: false,
            atomic: false,
            font_size: self.config.font_size,
            style: TextStyle::PLAIN,
            color: self.config.font_color,
            ref_to: None,
        }
    }

    /// A run for the `text` attribute of `tag`, or `None` when it is empty.
    fn tag_run(&self, tag: &Tag) -> Option<(TextRun, Range<usize>)> {
        let value = tag.attributes.attribute("text")?;
        if value.value.is_empty() {
            return None;
        }
        let run = TextRun {
            tag: Some(tag.span()),
            value_span: Some(value.span.clone()),
            quote_require_escape: true,
            atomic: self.config.atom_markup,
            ..self.plain_run()
        };
        Some((run, value.span.clone()))
    }

    fn handle_text(&mut self, span: &TextSpan<'_>) {
        let run = self.plain_run();
        self.add_text(&run, span.text, span.start);
    }

    fn handle_ref(&mut self, tag: &Tag) {
        let Some((mut run, value)) = self.tag_run(tag) else {
            return;
        };
        match tag.attributes.get("dst").filter(|dst| !dst.is_empty()) {
            None => warn_once(
                "integrate",
                &format!("<ref> at byte {} has no dst; shown as plain text", tag.start),
            ),
            Some(dst) => {
                let force = tag.attributes.get_bool("force", false);
                if force || self.env.resolve_link(dst) {
                    run.color = self.config.link_color;
                    run.style.underline = true;
                    run.ref_to = Some(dst.to_owned());
                } else {
                    warn_once("integrate", &format!("broken link to '{dst}'"));
                    run.color = self.config.broken_link_color;
                }
            }
        }
        let src = self.src;
        self.add_text(&run, &src[value.clone()], value.start);
    }

    fn handle_format(&mut self, tag: &Tag) {
        let Some((mut run, value)) = self.tag_run(tag) else {
            return;
        };
        let attrs = &tag.attributes;
        run.style.bold = attrs.get_bool("bold", false);
        run.style.italic = attrs.get_bool("italic", false);
        if let Some(size) = attrs
            .get_int("font_size")
            .and_then(|size| u32::try_from(size).ok())
            .filter(|&size| size > 0)
        {
            run.font_size = size;
        }
        if let Some(color) = attrs.get("color") {
            match self.parse_color(color) {
                Some(color) => run.color = color,
                None => warn_once("integrate", &format!("unusable colour '{color}'")),
            }
        }
        let src = self.src;
        self.add_text(&run, &src[value.clone()], value.start);
    }

    /// `a,r,g,b`, a palette index, or a colour name.
    fn parse_color(&self, text: &str) -> Option<Color> {
        let text = text.trim();
        if text.contains(',') {
            return Color::decode(text);
        }
        if let Ok(index) = text.parse::<usize>() {
            return self.config.palette.get(index).copied();
        }
        Color::named(text)
    }

    /// Lay out the raw source `raw`, which starts at byte `base`.
    fn add_text(&mut self, run: &TextRun, raw: &str, base: usize) {
        let chars: Vec<EscapedChar> = EscapedChars::new(raw, run.quote_require_escape).collect();
        let mut index = 0;
        let mut line_start = 0;
        for (i, c) in chars.iter().enumerate() {
            if c.ch != '\n' {
                continue;
            }
            self.add_line(run, &chars[line_start..i], base, &mut index);
            let spacer = self.spacer_item(run, base + c.source.start, c.source.len(), index);
            index += 1;
            let _ = self.layout.add_item(spacer);
            self.layout.down_one_line();
            line_start = i + 1;
        }
        self.add_line(run, &chars[line_start..], base, &mut index);
    }

    /// Lay out characters without line feeds, wrapping as needed.
    fn add_line(&mut self, run: &TextRun, mut chars: &[EscapedChar], base: usize, index: &mut usize) {
        let env = self.env;
        let metrics = &*env.metrics;
        while let Some(first) = chars.first() {
            let text: String = chars.iter().map(|c| c.ch).collect();
            let remaining = self.layout.remaining_width();

            let first_word = linebreak::first_word(&text);
            if !self.layout.row_is_empty()
                && remaining < metrics.text_width(first_word, run.font_size, run.style)
            {
                // The first word does not fit behind what is already on the row.
                self.layout.down_one_line();
                if !self.config.editable && first.ch == ' ' {
                    chars = &chars[1..];
                }
                continue;
            }

            let end = linebreak::fit_prefix(metrics, &text, run.font_size, run.style, remaining);
            if self.layout.row_is_empty()
                && self.layout.narrowed_by_floats()
                && metrics.text_width(&text[..end], run.font_size, run.style) > remaining
            {
                self.layout.down_one_line();
                continue;
            }

            let taken = chars
                .iter()
                .take_while(|c| c.decoded - first.decoded < end)
                .count();
            let (head, tail) = chars.split_at(taken);
            let pos = base + first.source.start;
            let src_size = head.last().map_or(0, |c| c.source.end - first.source.start);
            let item = self.text_item(run, *index, pos, src_size, text[..end].to_owned());
            *index += 1;
            let _ = self.layout.add_item(item);
            chars = tail;
        }
    }

    fn base_item(&self, run: &TextRun, index: usize, pos: usize, src_size: usize) -> Item {
        let markup = run.tag.clone().unwrap_or(pos..pos + src_size);
        Item {
            index,
            rect: Rect::default(),
            holden_rect: Rect::default(),
            markup_pos: markup.start,
            markup_end: markup.end,
            pos,
            src_size,
            value_span: run.value_span.clone(),
            text: String::new(),
            font_size: run.font_size,
            style: run.style,
            color: run.color,
            ref_to: run.ref_to.clone(),
            floating: false,
            boxed: false,
            align: Align::Here,
            quote_require_escape: run.quote_require_escape,
            atomic: run.atomic,
            content: Content::Text,
        }
    }

    fn text_item(&self, run: &TextRun, index: usize, pos: usize, src_size: usize, text: String) -> Item {
        let size = self.env.metrics.measure(&text, run.font_size, run.style);
        let rect = Rect::new(self.layout.x(), self.layout.y(), size.w, size.h);
        tracing::trace!(
            target: "integrate.layout",
            pos,
            src_size,
            x = rect.x,
            y = rect.y,
            w = rect.w,
            "text item"
        );
        Item {
            rect,
            text,
            ..self.base_item(run, index, pos, src_size)
        }
    }

    fn spacer_item(&self, run: &TextRun, pos: usize, src_size: usize, index: usize) -> Item {
        let h = self.env.metrics.line_height(run.font_size);
        Item {
            rect: Rect::new(self.layout.x(), self.layout.y(), 0, h),
            content: Content::Spacer,
            ..self.base_item(run, index, pos, src_size)
        }
    }

    fn handle_img(&mut self, tag: &Tag) {
        let attrs = &tag.attributes;
        let path = attrs.get_or_empty("src");
        let floating = attrs.get_bool("float", false);
        let mut boxed = attrs.get_bool("box", false);
        let align_name = attrs.get_or_empty("align");
        let align = Align::from_name(align_name).unwrap_or_else(|| {
            warn_once("integrate", &format!("invalid image alignment '{align_name}'"));
            Align::Left
        });

        let (content, mut w, mut h) = self.resolve_image(tag, path);
        let missing = matches!(content, Content::Image { image: None, .. });
        if missing {
            boxed = false;
        } else if boxed {
            w += BOX_WIDTH * 2;
            h += BOX_WIDTH * 2;
        }
        self.place_image(tag, content, w, h, align, floating, boxed);
    }

    /// Content and unboxed size of an `<img>`. Failed lookups produce an
    /// empty placeholder that still covers the tag's source bytes.
    fn resolve_image(&self, tag: &Tag, path: &str) -> (Content, i32, i32) {
        let placeholder = || {
            let content = Content::Image {
                path: path.to_owned(),
                image: None,
            };
            (content, 0, 0)
        };

        if path.is_empty() {
            warn_once(
                "integrate",
                &format!("<img> at byte {} has no src", tag.start),
            );
            return placeholder();
        }

        if let Some(at) = path.find(ANIMATION_PREFIX) {
            let id = &path[at + ANIMATION_PREFIX.len()..];
            let known = self
                .env
                .animations
                .as_ref()
                .is_some_and(|host| host.find_animation(id));
            if !known {
                warn_once("integrate", &format!("unknown animation '{id}'"));
                return placeholder();
            }
            let dimension = |key| {
                tag.attributes
                    .get_int(key)
                    .and_then(|v| i32::try_from(v).ok())
                    .filter(|&v| v > 0)
            };
            let (Some(w), Some(h)) = (dimension("width"), dimension("height")) else {
                warn_once(
                    "integrate",
                    &format!("animation '{id}' needs positive width and height"),
                );
                return placeholder();
            };
            let content = Content::Animation {
                id: id.to_owned(),
                attributes: tag.attributes.clone(),
            };
            return (content, w, h);
        }

        let Some(image) = self.env.lookup_image(path, self.config.hdpi_scale) else {
            warn_once("integrate", &format!("image not found: {path}"));
            return placeholder();
        };
        let (w, h) = adaptive_scale(
            i32::try_from(image.width()).unwrap_or(i32::MAX),
            i32::try_from(image.height()).unwrap_or(i32::MAX),
            self.config.screen_ratio,
        );
        let content = Content::Image {
            path: path.to_owned(),
            image: Some(image),
        };
        (content, w, h)
    }

    fn image_origin(&self, align: Align, w: i32) -> (i32, i32) {
        let max = self.layout.max_width();
        let y = self.layout.y();
        match align {
            Align::Here => (self.layout.x(), y),
            Align::Left => (0, y),
            Align::Middle => (max / 2 - w / 2, y),
            Align::Right => (max - w, y),
            Align::Back => self
                .layout
                .items()
                .last()
                .map_or((self.layout.x(), y), |prev| (prev.rect.x, prev.rect.y)),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn place_image(
        &mut self,
        tag: &Tag,
        content: Content,
        w: i32,
        h: i32,
        align: Align,
        floating: bool,
        boxed: bool,
    ) {
        let mut align = align;
        if align == Align::Back && self.layout.items().is_empty() {
            align = Align::Here;
        }
        if align == Align::Here && floating {
            align = Align::Left;
        }

        let (mut x, mut y) = self.image_origin(align, w);
        let cursor_x = self.layout.x();
        if align != Align::Back
            && cursor_x != self.layout.min_x()
            && (x < cursor_x || x + w > self.layout.max_width())
        {
            self.layout.down_one_line();
            (x, y) = self.image_origin(align, w);
        }

        if floating {
            y = self.layout.floating_y(x, w);
        } else {
            self.layout.set_x(x);
        }

        let run = self.plain_run();
        let span = tag.span();
        let item = Item {
            rect: Rect::new(x, y, w, h),
            markup_pos: span.start,
            markup_end: span.end,
            floating,
            boxed,
            align,
            atomic: true,
            content,
            ..self.base_item(&run, 0, span.start, span.len())
        };
        tracing::trace!(
            target: "integrate.layout",
            pos = span.start,
            x,
            y,
            w,
            h,
            floating,
            "image item"
        );
        let _ = self.layout.add_item(item);
    }

    fn handle_jump(&mut self, tag: &Tag) {
        let attrs = &tag.attributes;
        // `Some(None)` marks a value that is present but not a pixel count.
        let parse = |key: &str| {
            attrs.get(key).map(|v| {
                v.trim()
                    .parse::<u32>()
                    .ok()
                    .and_then(|v| i32::try_from(v).ok())
            })
        };
        let (amount, to) = (parse("amount"), parse("to"));
        if matches!(amount, Some(None)) || matches!(to, Some(None)) {
            warn_once(
                "integrate",
                &format!("<jump> at byte {} has a non-numeric value", tag.start),
            );
            return;
        }
        let (amount, to) = (amount.flatten(), to.flatten());
        if amount.is_none() && to.is_none() {
            warn_once(
                "integrate",
                &format!("<jump> at byte {} needs amount or to", tag.start),
            );
            return;
        }

        let mut target = self.layout.x();
        if let Some(amount) = amount {
            target = target.saturating_add(amount);
        }
        if let Some(to) = to {
            if to < target {
                self.layout.down_one_line();
            }
            target = to;
        }
        if target != 0 && target < self.layout.max_x() {
            self.layout.set_x(target);
        }
    }
}

/// Displayed size of a `w` x `h` bitmap on a screen `ratio` times denser
/// than the layout.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn adaptive_scale(w: i32, h: i32, ratio: f64) -> (i32, i32) {
    if ratio <= 1.0 {
        return (w, h);
    }
    let ratio = ratio.min(2.0);
    let min = if ratio <= 1.5 { 64 } else { 48 };
    if w <= min || h <= min {
        return (w, h);
    }
    let scale = (f64::from(w) / f64::from(min))
        .min(f64::from(h) / f64::from(min))
        .min(ratio);
    ((f64::from(w) / scale) as i32, (f64::from(h) / scale) as i32)
}
