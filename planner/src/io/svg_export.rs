use std::fmt::{Display, Formatter};

use anyhow::{Result, ensure};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Group, Path, Text, Title};

use toolbox_rs::entities::{Container, Session};
use toolbox_rs::geometry::primitives::Rect;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Copy)]
pub struct SvgDrawOptions {
    ///The theme to use for the svg
    #[serde(default)]
    pub theme: SvgLayoutTheme,
    ///Draw a grid with unit spacing in every container
    #[serde(default)]
    pub grid: bool,
    ///Print the name and dimensions on top of every placed item
    #[serde(default)]
    pub item_labels: bool,
    ///Draw the outline of the selected container in the highlight color
    #[serde(default)]
    pub highlight_selected: bool,
}

impl Default for SvgDrawOptions {
    fn default() -> Self {
        Self {
            theme: SvgLayoutTheme::default(),
            grid: true,
            item_labels: true,
            highlight_selected: true,
        }
    }
}

pub const N_ITEM_COLORS: usize = 6;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Copy)]
pub struct SvgLayoutTheme {
    pub stroke_width_multiplier: f32,
    pub toolbox_fill: Color,
    pub container_fill: Color,
    pub grid_color: Color,
    pub highlight_color: Color,
    ///Items are colored by their id, cycling through these
    pub item_fills: [Color; N_ITEM_COLORS],
}

impl Default for SvgLayoutTheme {
    fn default() -> Self {
        SvgLayoutTheme::WORKSHOP
    }
}

impl SvgLayoutTheme {
    pub const WORKSHOP: SvgLayoutTheme = SvgLayoutTheme {
        stroke_width_multiplier: 2.0,
        toolbox_fill: Color(0x5D, 0x6D, 0x7E),
        container_fill: Color(0xEC, 0xF0, 0xF1),
        grid_color: Color(0xBD, 0xC3, 0xC7),
        highlight_color: Color(0xE6, 0x7E, 0x22),
        item_fills: [
            Color(0x34, 0x98, 0xDB), // BLUE
            Color(0xE7, 0x4C, 0x3C), // RED
            Color(0x2E, 0xCC, 0x71), // GREEN
            Color(0xF3, 0x9C, 0x12), // ORANGE
            Color(0x9B, 0x59, 0xB6), // PURPLE
            Color(0x1A, 0xBC, 0x9C), // TURQUOISE
        ],
    };
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Color(u8, u8, u8);

impl Color {
    /// Parses a color in `#RRGGBB` notation, the leading `#` is optional
    pub fn parse(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        ensure!(
            hex.len() == 6 && hex.is_ascii(),
            "expected a color in #RRGGBB notation, got {s:?}"
        );
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        Ok(Color(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).map_err(serde::de::Error::custom)
    }
}

pub fn change_brightness(color: Color, fraction: f32) -> Color {
    let Color(r, g, b) = color;

    let r = (r as f32 * fraction) as u8;
    let g = (g as f32 * fraction) as u8;
    let b = (b as f32 * fraction) as u8;
    Color(r, g, b)
}

pub fn rect_data(rect: &Rect) -> Data {
    Data::new()
        .move_to((rect.x_min, rect.y_min))
        .line_to((rect.x_max, rect.y_min))
        .line_to((rect.x_max, rect.y_max))
        .line_to((rect.x_min, rect.y_max))
        .close()
}

pub fn data_to_path(data: Data, params: &[(&str, &str)]) -> Path {
    let mut path = Path::new();
    for param in params {
        path = path.set(param.0, param.1)
    }
    path.set("d", data)
}

/// Draws the toolbox with its containers stacked from top to bottom, and the items placed in them.
pub fn toolbox_to_svg(session: &Session, options: SvgDrawOptions) -> Document {
    let toolbox = session.toolbox();
    let theme = &options.theme;

    //containers may overflow the bottom of the toolbox
    let height = f32::max(toolbox.height, session.stacked_height());
    let outline = Rect::from_origin(0.0, 0.0, toolbox.width, height);
    let pad = 0.05 * f32::max(outline.width(), outline.height());
    let vbox = Rect::from_origin(
        -pad,
        -pad,
        outline.width() + 2.0 * pad,
        outline.height() + 2.0 * pad,
    );

    let stroke_width =
        f32::min(vbox.width(), vbox.height()) * 0.001 * theme.stroke_width_multiplier;

    let toolbox_group = {
        let bbox = Rect::from_origin(0.0, 0.0, toolbox.width, toolbox.height);
        Group::new()
            .set("id", "toolbox")
            .add(data_to_path(
                rect_data(&bbox),
                &[
                    ("fill", &*theme.toolbox_fill.to_string()),
                    ("stroke", "black"),
                    ("stroke-width", &*format!("{}", 2.0 * stroke_width)),
                ],
            ))
            .add(Title::new(format!(
                "toolbox, {} x {} x {}",
                toolbox.width, toolbox.height, toolbox.depth
            )))
    };

    let selected = session.selected();
    let mut containers_group = Group::new().set("id", "containers");
    for (key, container) in session.containers() {
        let is_selected = options.highlight_selected && selected == Some(key);
        containers_group = containers_group.add(container_group(
            session,
            container,
            is_selected,
            &options,
            stroke_width,
        ));
    }

    let label = {
        let n_placements: usize = session.containers().map(|(_, c)| c.placements().len()).sum();
        let font_size = f32::min(outline.width(), outline.height()) * 0.025;
        Text::new(format!(
            "toolbox: {} x {} x {} | containers: {} | placements: {}",
            toolbox.width,
            toolbox.height,
            toolbox.depth,
            session.containers().count(),
            n_placements
        ))
        .set("x", 0.0)
        .set("y", -0.5 * font_size)
        .set("font-size", font_size)
        .set("font-family", "monospace")
        .set("font-weight", "500")
    };

    Document::new()
        .set("viewBox", (vbox.x_min, vbox.y_min, vbox.width(), vbox.height()))
        .add(toolbox_group)
        .add(containers_group)
        .add(label)
}

fn container_group(
    session: &Session,
    container: &Container,
    selected: bool,
    options: &SvgDrawOptions,
    stroke_width: f32,
) -> Group {
    let theme = &options.theme;
    let offset = container.offset();
    let bbox = container.bbox();
    let stroke = match selected {
        true => theme.highlight_color.to_string(),
        false => "black".to_string(),
    };

    //all children are drawn in container coordinates
    let mut group = Group::new()
        .set("id", container.name.replace(' ', "_").to_lowercase())
        .set("transform", format!("translate(0 {offset})"))
        .add(data_to_path(
            rect_data(&bbox),
            &[
                ("fill", &*theme.container_fill.to_string()),
                ("stroke", &*stroke),
                ("stroke-width", &*format!("{}", 2.0 * stroke_width)),
            ],
        ))
        .add(Title::new(format!(
            "{}, {} x {}, offset: {offset}, density: {:.1}%",
            container.name,
            container.width(),
            container.height(),
            100.0 * container.density(session.catalog())
        )));

    if options.grid {
        let mut data = Data::new();
        for x in (1..container.width().ceil() as usize).map(|x| x as f32) {
            data = data.move_to((x, 0.0)).line_to((x, container.height()));
        }
        for y in (1..container.height().ceil() as usize).map(|y| y as f32) {
            data = data.move_to((0.0, y)).line_to((container.width(), y));
        }
        group = group.add(data_to_path(
            data,
            &[
                ("fill", "none"),
                ("stroke", &*theme.grid_color.to_string()),
                ("stroke-width", &*format!("{}", 0.5 * stroke_width)),
            ],
        ));
    }

    for p in container.placements() {
        let Some(item) = session.catalog().item(p.item_id) else {
            continue;
        };
        let rect = item.rect_at(p.position);
        let fill = theme.item_fills[item.id.0 % N_ITEM_COLORS];
        group = group.add(
            data_to_path(
                rect_data(&rect),
                &[
                    ("fill", &*fill.to_string()),
                    ("fill-opacity", "0.8"),
                    ("stroke", &*change_brightness(fill, 0.5).to_string()),
                    ("stroke-width", &*format!("{}", stroke_width)),
                ],
            )
            .add(Title::new(format!(
                "{} {}, {:.1} x {:.1} at {}",
                item.name, p.instance_id, item.width, item.height, p.position
            ))),
        );
        if options.item_labels {
            let font_size = f32::min(rect.width(), rect.height()) * 0.2;
            group = group.add(
                Text::new(format!("{} {:.1}x{:.1}", item.name, item.width, item.height))
                    .set("x", rect.x_min + 0.5 * font_size)
                    .set("y", rect.y_min + 1.5 * font_size)
                    .set("font-size", font_size)
                    .set("font-family", "monospace"),
            );
        }
    }

    let font_size = f32::min(container.height() * 0.25, 0.5);
    group.add(
        Text::new(container.name.clone())
            .set("x", 0.5 * font_size)
            .set("y", 1.2 * font_size)
            .set("font-size", font_size)
            .set("font-family", "monospace")
            .set("fill-opacity", "0.6"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolbox_rs::entities::{ContainerKind, Toolbox};
    use toolbox_rs::geometry::primitives::Point;
    use toolbox_rs::util::PlacementConfig;

    #[test]
    fn colors_round_trip_through_hex() {
        let color = Color::parse("#3498db").unwrap();
        assert_eq!(color, Color(0x34, 0x98, 0xDB));
        assert_eq!(color.to_string(), "#3498DB");
        assert_eq!(Color::parse("3498DB").unwrap(), color);
        assert!(Color::parse("#34").is_err());
        assert!(Color::parse("#zzzzzz").is_err());
    }

    #[test]
    fn every_placement_is_drawn() {
        let mut session = Session::new(Toolbox::default(), PlacementConfig::default()).unwrap();
        let item = session.catalog_mut().add_item("Wrench", 1.0, 1.5).unwrap();
        let drawer = session.add_container(ContainerKind::Drawer);
        session.add_container(ContainerKind::Shelf);
        session.select_container(drawer).unwrap();
        session.place_item(item, Point(0.0, 0.0)).unwrap();
        session.place_item(item, Point(4.0, 0.0)).unwrap();

        let svg = toolbox_to_svg(&session, SvgDrawOptions::default()).to_string();
        assert!(svg.contains("id=\"drawer_1\""));
        assert!(svg.contains("id=\"shelf_2\""));
        assert_eq!(svg.matches("Wrench #").count(), 2);
        assert!(svg.contains("Drawer 1, 20 x 2, offset: 0, density: 7.5%"));
        assert!(svg.contains(&SvgLayoutTheme::WORKSHOP.highlight_color.to_string()));
    }
}
