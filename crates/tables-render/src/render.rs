//! Table rendering.
//!
//! Output, top to bottom: the title box, the top rule, the header row, the
//! header separator, the data rows (with break separators), the summary row,
//! the bottom rule and the footer box. Every physical line is exactly as wide
//! as the rule it sits under, except the caption boxes, which may be
//! narrower and are indented by their offset.
//!
//! The outer rules are resolved glyph by glyph. Position 0 is the left
//! border, `table_width + 1` the right border, and a caption box whose edges
//! land inside that span turns the plain horizontal line into a junction
//! pointing at the caption. Where a caption edge and a column separator
//! coincide the glyph is a full cross.

use std::collections::BTreeSet;

use console::Style;

use crate::fit::TableContext;
use crate::layout::{Caption, Column, Justify, Position};
use crate::theme::{BorderChars, Palette, Theme};
use crate::util::{clip, clip_end, display_width, justify};

/// Renders a fitted table to a string. With `styled` the border, captions,
/// headers, body and summary carry the theme's ANSI colors; without it the
/// output is plain text with an identical layout.
pub fn render_table(ctx: &TableContext<'_>, theme: &Theme, styled: bool) -> String {
    let visible = ctx.visible();
    if visible.is_empty() {
        tracing::warn!("no visible columns, nothing to render");
        return String::new();
    }

    let renderer = Renderer::new(ctx, &visible, theme, styled);
    let lines = renderer.lines();
    tracing::debug!(lines = lines.len(), width = ctx.table_width() + 2, "rendered table");

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Geometry of a title or footer box, in rule positions.
#[derive(Clone, Debug, PartialEq, Eq)]
struct CaptionBox<'c> {
    caption: &'c Caption,
    /// Spaces before the box's left edge.
    offset: usize,
    /// Inner width, between the two vertical edges.
    width: usize,
}

impl<'c> CaptionBox<'c> {
    fn new(caption: &'c Caption, table_width: usize) -> Self {
        let natural = display_width(&caption.text) + 2;
        let width = match caption.position {
            Position::Full => table_width,
            Position::None => natural,
            Position::Left | Position::Right | Position::Center => natural.min(table_width),
        };
        let slack = table_width.saturating_sub(width);
        let offset = match caption.position {
            Position::Left | Position::Full | Position::None => 0,
            Position::Right => slack,
            Position::Center => slack / 2,
        };
        CaptionBox {
            caption,
            offset,
            width,
        }
    }

    fn start(&self) -> usize {
        self.offset
    }

    fn end(&self) -> usize {
        self.offset + self.width + 1
    }

    fn is_edge(&self, position: usize) -> bool {
        position == self.start() || position == self.end()
    }

    /// The text between the box's vertical edges, one space of padding on
    /// each side.
    fn content(&self) -> String {
        let inner = self.width.saturating_sub(2);
        let align = match self.caption.position {
            Position::Full => Justify::Center,
            _ => Justify::Left,
        };
        let text = clip_end(&self.caption.text, inner);
        let padded = format!(" {} ", justify(&text, inner, align));
        clip_end(&padded, self.width)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edge {
    Top,
    Bottom,
}

struct Renderer<'r, 'a> {
    ctx: &'r TableContext<'a>,
    visible: &'r [usize],
    chars: BorderChars,
    palette: Option<Palette>,
    table_width: usize,
    separators: BTreeSet<usize>,
}

impl<'r, 'a> Renderer<'r, 'a> {
    fn new(ctx: &'r TableContext<'a>, visible: &'r [usize], theme: &Theme, styled: bool) -> Self {
        let mut separators = BTreeSet::new();
        let mut position = 0;
        for &column in &visible[..visible.len() - 1] {
            position += ctx.widths[column] + 1;
            separators.insert(position);
        }
        Renderer {
            ctx,
            visible,
            chars: theme.border,
            palette: styled.then(|| theme.palette.forced()),
            table_width: ctx.table_width(),
            separators,
        }
    }

    fn lines(&self) -> Vec<String> {
        let layout = self.ctx.layout;
        let title = layout
            .title
            .as_ref()
            .map(|c| CaptionBox::new(c, self.table_width));
        let footer = layout
            .footer
            .as_ref()
            .map(|c| CaptionBox::new(c, self.table_width));

        let mut lines = Vec::new();

        if let Some(title) = &title {
            lines.push(self.box_rule(title, self.chars.top_left, self.chars.top_right));
            lines.push(self.box_text(title, |p| &p.caption));
        }
        lines.push(self.outer_rule(title.as_ref(), Edge::Top));

        let headers: Vec<String> = self.columns().map(|c| c.header.clone()).collect();
        lines.push(self.row_line(&headers, |p| &p.header));
        lines.push(self.mid_rule());

        let mut previous: Option<Vec<Option<String>>> = None;
        for (index, row) in self.ctx.rows.iter().enumerate() {
            let breaks: Vec<Option<String>> = layout
                .columns
                .iter()
                .filter(|c| c.break_on_change)
                .map(|c| row.raw(&c.key))
                .collect();
            if previous.as_ref().is_some_and(|prev| *prev != breaks) {
                lines.push(self.mid_rule());
            }
            previous = Some(breaks);

            for line in 0..self.ctx.row_heights[index] {
                let texts: Vec<String> = self
                    .visible
                    .iter()
                    .map(|&column| {
                        self.ctx
                            .segments(index, column)
                            .get(line)
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect();
                lines.push(self.row_line(&texts, |p| &p.text));
            }
        }

        if self.ctx.has_summary() {
            lines.push(self.mid_rule());
            let summaries: Vec<String> = self
                .visible
                .iter()
                .map(|&column| self.ctx.summaries[column].clone())
                .collect();
            lines.push(self.row_line(&summaries, |p| &p.summary));
        }

        lines.push(self.outer_rule(footer.as_ref(), Edge::Bottom));
        if let Some(footer) = &footer {
            lines.push(self.box_text(footer, |p| &p.footer));
            lines.push(self.box_rule(footer, self.chars.bottom_left, self.chars.bottom_right));
        }
        lines
    }

    fn columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.visible
            .iter()
            .map(move |&i| &self.ctx.layout.columns[i])
    }

    fn paint(&self, text: &str, style: impl Fn(&Palette) -> &Style) -> String {
        match &self.palette {
            Some(palette) if !text.is_empty() => style(palette).apply_to(text).to_string(),
            _ => text.to_string(),
        }
    }

    fn border(&self, text: &str) -> String {
        self.paint(text, |p| &p.border)
    }

    /// One physical line of cells, each padded, clipped and justified to its
    /// column width.
    fn row_line(&self, texts: &[String], style: impl Fn(&Palette) -> &Style) -> String {
        let vertical = self.border(&self.chars.vertical.to_string());
        let mut line = vertical.clone();
        for (&index, text) in self.visible.iter().zip(texts) {
            let column = &self.ctx.layout.columns[index];
            line.push_str(&self.paint(&cell(text, self.ctx.widths[index], column), &style));
            line.push_str(&vertical);
        }
        line
    }

    fn mid_rule(&self) -> String {
        let c = &self.chars;
        let mut rule = String::new();
        for position in 0..=self.table_width + 1 {
            let glyph = if position == 0 {
                c.left_t
            } else if position == self.table_width + 1 {
                c.right_t
            } else if self.separators.contains(&position) {
                c.cross
            } else {
                c.horizontal
            };
            rule.push(glyph);
        }
        self.border(&rule)
    }

    /// The top or bottom rule, with junctions where the caption box meets it.
    fn outer_rule(&self, caption: Option<&CaptionBox<'_>>, edge: Edge) -> String {
        let table_end = self.table_width + 1;
        let last = caption.map_or(table_end, |b| b.end().max(table_end));
        let mut rule = String::new();
        for position in 0..=last {
            rule.push(self.outer_glyph(position, caption, edge));
        }
        self.border(&rule)
    }

    fn outer_glyph(&self, position: usize, caption: Option<&CaptionBox<'_>>, edge: Edge) -> char {
        let c = &self.chars;
        let table_end = self.table_width + 1;
        let separator = self.separators.contains(&position);
        let (corner_start, corner_end, toward_table, toward_caption, beyond_corner) = match edge {
            Edge::Top => (c.top_left, c.top_right, c.top_t, c.bottom_t, c.bottom_right),
            Edge::Bottom => (c.bottom_left, c.bottom_right, c.bottom_t, c.top_t, c.top_right),
        };

        let Some(caption) = caption else {
            return if position == 0 {
                corner_start
            } else if position == table_end {
                corner_end
            } else if separator {
                toward_table
            } else {
                c.horizontal
            };
        };

        if position == 0 {
            if caption.start() == 0 {
                c.left_t
            } else {
                corner_start
            }
        } else if position == table_end {
            if caption.end() == table_end {
                c.right_t
            } else if caption.end() > table_end {
                // The caption continues past the table's corner.
                toward_table
            } else {
                corner_end
            }
        } else if position > table_end {
            if position == caption.end() {
                beyond_corner
            } else {
                c.horizontal
            }
        } else if caption.is_edge(position) {
            if separator {
                c.cross
            } else {
                toward_caption
            }
        } else if separator {
            toward_table
        } else {
            c.horizontal
        }
    }

    /// The caption box's own closing rule: above the title, below the footer.
    fn box_rule(&self, caption: &CaptionBox<'_>, left: char, right: char) -> String {
        let mut rule = String::new();
        rule.push(left);
        rule.extend(std::iter::repeat(self.chars.horizontal).take(caption.width));
        rule.push(right);
        format!("{}{}", " ".repeat(caption.offset), self.border(&rule))
    }

    fn box_text(&self, caption: &CaptionBox<'_>, style: impl Fn(&Palette) -> &Style) -> String {
        let vertical = self.border(&self.chars.vertical.to_string());
        format!(
            "{}{}{}{}",
            " ".repeat(caption.offset),
            vertical,
            self.paint(&caption.content(), style),
            vertical
        )
    }
}

/// A cell's text laid into its column: padding on both sides, the content
/// clipped from the side implied by the justification, then justified.
fn cell(text: &str, width: usize, column: &Column) -> String {
    let pad = " ".repeat(column.padding);
    let content = width.saturating_sub(2 * column.padding);
    let clipped = clip(text, content, column.justification);
    format!(
        "{}{}{}",
        pad,
        justify(&clipped, content, column.justification),
        pad
    )
}
