//! MusicXML reader: DOM walk from `score-partwise` down to note payloads

use std::str::FromStr;

use log::debug;
use roxmltree::{Document, Node};

use crate::error::{Error, Result};
use crate::models::attributes::{Attributes, Clef, ClefSign, Key, Time, Transpose};
use crate::models::barline::{Barline, BarlineLocation, BarStyle, Ending, EndingType, Repeat};
use crate::models::common::{
    BackwardForward, Font, Mode, Placement, StartStop, StartStopContinue, StartStopSingle, UpDown,
};
use crate::models::direction::{
    Direction, DirectionType, DynamicMark, Dynamics, FormattedText, Metronome, OctaveShiftType,
    PedalType, Sound, Wedge, WedgeType,
};
use crate::models::harmony::{
    Bass, Degree, DegreeType, FiguredBass, Figure, Frame, FrameNote, Harmony, Root,
};
use crate::models::layout::{
    Appearance, LineWidth, NoteSize, PageLayout, PageMargins, Print, Scaling, StaffLayout,
    SystemLayout, SystemMargins,
};
use crate::models::measure::{
    Backup, Bookmark, Feature, Forward, Grouping, Link, Measure, MeasureEntry, Part,
};
use crate::models::notations::{
    Articulation, MordentAttrs, Notation, Notations, Ornament, Placed, Technical,
};
use crate::models::note::{
    Accidental, Beam, BeamValue, Grace, Lyric, Note, NoteKind, NoteTypeValue, Pitch, PitchedNote,
    Rest, Step, Stem, Syllabic, TimeModification, Unpitched,
};
use crate::models::score::{
    Credit, CreditWords, Creator, Defaults, Encoding, GroupSymbol, Identification,
    MidiInstrument, MiscellaneousField, PartGroup, PartList, PartListEntry, ScoreInstrument,
    ScorePart, ScorePartwise, Supports, Work,
};

/// Parse a partwise score from XML text.
pub fn read_document(xml: &str) -> Result<ScorePartwise> {
    // roxmltree rejects DTDs, so the DOCTYPE line is dropped up front
    let stripped: String = if xml.contains("<!DOCTYPE") {
        xml.lines()
            .filter(|line| !line.trim_start().starts_with("<!DOCTYPE"))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        xml.to_string()
    };

    let doc = Document::parse(&stripped).map_err(|e| Error::Xml(e.to_string()))?;
    let root = doc.root_element();
    if root.tag_name().name() != "score-partwise" {
        return Err(Error::UnsupportedFormat(format!(
            "expected score-partwise, found {}",
            root.tag_name().name()
        )));
    }
    parse_score(root)
}

// ---------------------------------------------------------------------------
// generic node helpers
// ---------------------------------------------------------------------------

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

fn get_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    elements(node).find(|n| n.tag_name().name() == tag)
}

fn get_text(node: Node) -> Option<String> {
    node.text().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn get_child_text(node: Node, tag: &str) -> Option<String> {
    get_child(node, tag).and_then(get_text)
}

fn child_value<T: FromStr>(node: Node, tag: &str) -> Option<T> {
    get_child_text(node, tag).and_then(|s| s.parse().ok())
}

fn attr_value<T: FromStr>(node: Node, name: &str) -> Option<T> {
    // Lookup by local name so namespaced attributes (xlink) resolve too
    node.attributes()
        .find(|a| a.name() == name)
        .and_then(|a| a.value().parse().ok())
}

fn attr_string(node: Node, name: &str) -> Option<String> {
    node.attributes()
        .find(|a| a.name() == name)
        .map(|a| a.value().to_string())
}

fn attr_yes_no(node: Node, name: &str) -> Option<bool> {
    attr_string(node, name).map(|v| v == "yes")
}

fn required_child_text(node: Node, tag: &str) -> Result<String> {
    get_child_text(node, tag)
        .ok_or_else(|| Error::MissingElement(format!("{}/{}", node.tag_name().name(), tag)))
}

// ---------------------------------------------------------------------------
// score header
// ---------------------------------------------------------------------------

fn parse_score(root: Node) -> Result<ScorePartwise> {
    let mut score = ScorePartwise::new();
    if let Some(version) = root.attribute("version") {
        score.version = version.to_string();
    }

    for child in elements(root) {
        match child.tag_name().name() {
            "work" => score.work = Some(parse_work(child)),
            "movement-number" => score.movement_number = get_text(child),
            "movement-title" => score.movement_title = get_text(child),
            "identification" => score.identification = Some(parse_identification(child)),
            "defaults" => score.defaults = Some(parse_defaults(child)),
            "credit" => score.credits.push(parse_credit(child)),
            "part-list" => score.part_list = parse_part_list(child)?,
            "part" => score.parts.push(parse_part(child)?),
            other => debug!("skipping score element <{}>", other),
        }
    }

    if score.part_list.score_parts().next().is_none() {
        return Err(Error::MissingElement("part-list/score-part".to_string()));
    }
    Ok(score)
}

fn parse_work(node: Node) -> Work {
    Work {
        work_number: get_child_text(node, "work-number"),
        work_title: get_child_text(node, "work-title"),
        opus: get_child(node, "opus").and_then(|opus| attr_string(opus, "href")),
    }
}

fn parse_identification(node: Node) -> Identification {
    let mut identification = Identification::default();
    for child in elements(node) {
        match child.tag_name().name() {
            "creator" => {
                if let Some(name) = get_text(child) {
                    identification.creators.push(Creator {
                        creator_type: attr_string(child, "type"),
                        name,
                    });
                }
            }
            "rights" => {
                if let Some(text) = get_text(child) {
                    identification.rights.push(text);
                }
            }
            "encoding" => identification.encoding = Some(parse_encoding(child)),
            "source" => identification.source = get_text(child),
            "miscellaneous" => {
                for field in elements(child) {
                    if field.tag_name().name() == "miscellaneous-field" {
                        if let (Some(name), Some(value)) = (attr_string(field, "name"), get_text(field)) {
                            identification
                                .miscellaneous
                                .push(MiscellaneousField { name, value });
                        }
                    }
                }
            }
            other => debug!("skipping identification element <{}>", other),
        }
    }
    identification
}

fn parse_encoding(node: Node) -> Encoding {
    let mut encoding = Encoding::default();
    for child in elements(node) {
        match child.tag_name().name() {
            "software" => {
                if let Some(text) = get_text(child) {
                    encoding.software.push(text);
                }
            }
            "encoding-date" => encoding.encoding_date = get_text(child),
            "supports" => {
                if let Some(element) = attr_string(child, "element") {
                    encoding.supports.push(Supports {
                        element,
                        supported: attr_yes_no(child, "type").unwrap_or(false),
                    });
                }
            }
            _ => {}
        }
    }
    encoding
}

fn parse_defaults(node: Node) -> Defaults {
    let mut defaults = Defaults::default();
    for child in elements(node) {
        match child.tag_name().name() {
            "scaling" => {
                if let (Some(millimeters), Some(tenths)) =
                    (child_value(child, "millimeters"), child_value(child, "tenths"))
                {
                    defaults.scaling = Some(Scaling { millimeters, tenths });
                }
            }
            "page-layout" => defaults.page_layout = Some(parse_page_layout(child)),
            "system-layout" => defaults.system_layout = Some(parse_system_layout(child)),
            "staff-layout" => defaults.staff_layouts.push(parse_staff_layout(child)),
            "appearance" => defaults.appearance = Some(parse_appearance(child)),
            "music-font" => defaults.music_font = Some(parse_font(child)),
            "word-font" => defaults.word_font = Some(parse_font(child)),
            "lyric-font" => defaults.lyric_fonts.push(parse_font(child)),
            other => debug!("skipping defaults element <{}>", other),
        }
    }
    defaults
}

fn parse_font(node: Node) -> Font {
    Font {
        font_family: attr_string(node, "font-family"),
        font_size: attr_string(node, "font-size"),
    }
}

fn parse_page_layout(node: Node) -> PageLayout {
    let mut layout = PageLayout {
        page_height: child_value(node, "page-height"),
        page_width: child_value(node, "page-width"),
        margins: Vec::new(),
    };
    for child in elements(node) {
        if child.tag_name().name() == "page-margins" {
            layout.margins.push(PageMargins {
                margin_type: attr_string(child, "type"),
                left: child_value(child, "left-margin").unwrap_or(0.0),
                right: child_value(child, "right-margin").unwrap_or(0.0),
                top: child_value(child, "top-margin").unwrap_or(0.0),
                bottom: child_value(child, "bottom-margin").unwrap_or(0.0),
            });
        }
    }
    layout
}

fn parse_system_layout(node: Node) -> SystemLayout {
    SystemLayout {
        system_margins: get_child(node, "system-margins").map(|margins| SystemMargins {
            left: child_value(margins, "left-margin").unwrap_or(0.0),
            right: child_value(margins, "right-margin").unwrap_or(0.0),
        }),
        system_distance: child_value(node, "system-distance"),
        top_system_distance: child_value(node, "top-system-distance"),
    }
}

fn parse_staff_layout(node: Node) -> StaffLayout {
    StaffLayout {
        number: attr_value(node, "number"),
        staff_distance: child_value(node, "staff-distance"),
    }
}

fn parse_appearance(node: Node) -> Appearance {
    let mut appearance = Appearance::default();
    for child in elements(node) {
        match child.tag_name().name() {
            "line-width" => {
                if let (Some(line_type), Some(value)) =
                    (attr_string(child, "type"), get_text(child).and_then(|v| v.parse().ok()))
                {
                    appearance.line_widths.push(LineWidth { line_type, value });
                }
            }
            "note-size" => {
                if let (Some(size_type), Some(value)) =
                    (attr_string(child, "type"), get_text(child).and_then(|v| v.parse().ok()))
                {
                    appearance.note_sizes.push(NoteSize { size_type, value });
                }
            }
            other => debug!("skipping appearance element <{}>", other),
        }
    }
    appearance
}

fn parse_credit(node: Node) -> Credit {
    let mut credit = Credit {
        page: attr_value(node, "page"),
        ..Credit::default()
    };
    for child in elements(node) {
        match child.tag_name().name() {
            "credit-type" => {
                if let Some(text) = get_text(child) {
                    credit.credit_types.push(text);
                }
            }
            "credit-words" => credit.credit_words.push(CreditWords {
                text: get_text(child).unwrap_or_default(),
                default_x: attr_value(child, "default-x"),
                default_y: attr_value(child, "default-y"),
                font_size: attr_string(child, "font-size"),
                justify: attr_string(child, "justify"),
            }),
            _ => {}
        }
    }
    credit
}

fn parse_part_list(node: Node) -> Result<PartList> {
    let mut list = PartList::default();
    for child in elements(node) {
        match child.tag_name().name() {
            "part-group" => {
                let group_type = attr_string(child, "type")
                    .as_deref()
                    .and_then(StartStop::from_name)
                    .ok_or_else(|| Error::MissingElement("part-group type".to_string()))?;
                list.entries.push(PartListEntry::PartGroup(PartGroup {
                    group_type,
                    number: attr_string(child, "number"),
                    group_name: get_child_text(child, "group-name"),
                    group_symbol: get_child_text(child, "group-symbol")
                        .as_deref()
                        .and_then(GroupSymbol::from_name),
                    group_barline: get_child_text(child, "group-barline").map(|v| v == "yes"),
                }));
            }
            "score-part" => list.entries.push(PartListEntry::ScorePart(parse_score_part(child)?)),
            other => debug!("skipping part-list element <{}>", other),
        }
    }
    Ok(list)
}

fn parse_score_part(node: Node) -> Result<ScorePart> {
    let id = attr_string(node, "id")
        .ok_or_else(|| Error::MissingElement("score-part id".to_string()))?;
    let mut part = ScorePart::new(id, required_child_text(node, "part-name")?);
    part.part_abbreviation = get_child_text(node, "part-abbreviation");
    for child in elements(node) {
        match child.tag_name().name() {
            "score-instrument" => {
                if let Some(id) = attr_string(child, "id") {
                    part.score_instruments.push(ScoreInstrument {
                        id,
                        instrument_name: get_child_text(child, "instrument-name")
                            .unwrap_or_default(),
                    });
                }
            }
            "midi-instrument" => {
                if let Some(id) = attr_string(child, "id") {
                    part.midi_instruments.push(MidiInstrument {
                        id,
                        midi_channel: child_value(child, "midi-channel"),
                        midi_program: child_value(child, "midi-program"),
                        volume: child_value(child, "volume"),
                        pan: child_value(child, "pan"),
                    });
                }
            }
            _ => {}
        }
    }
    Ok(part)
}

// ---------------------------------------------------------------------------
// parts and measures
// ---------------------------------------------------------------------------

fn parse_part(node: Node) -> Result<Part> {
    let id = attr_string(node, "id")
        .ok_or_else(|| Error::MissingElement("part id".to_string()))?;
    let mut part = Part::new(id);
    for child in elements(node) {
        if child.tag_name().name() == "measure" {
            part.measures.push(parse_measure(child)?);
        }
    }
    Ok(part)
}

fn parse_measure(node: Node) -> Result<Measure> {
    let mut measure = Measure::new(attr_string(node, "number").unwrap_or_default());
    measure.width = attr_value(node, "width");
    measure.implicit = attr_yes_no(node, "implicit").unwrap_or(false);

    for child in elements(node) {
        let entry = match child.tag_name().name() {
            "note" => Some(MeasureEntry::Note(parse_note(child)?)),
            "backup" => Some(MeasureEntry::Backup(Backup {
                duration: child_value(child, "duration").unwrap_or(0),
            })),
            "forward" => Some(MeasureEntry::Forward(Forward {
                duration: child_value(child, "duration").unwrap_or(0),
                voice: get_child_text(child, "voice"),
                staff: get_child_text(child, "staff"),
            })),
            "attributes" => Some(MeasureEntry::Attributes(parse_attributes(child))),
            "direction" => Some(MeasureEntry::Direction(parse_direction(child))),
            "barline" => Some(MeasureEntry::Barline(parse_barline(child))),
            "harmony" => Some(MeasureEntry::Harmony(parse_harmony(child)?)),
            "figured-bass" => Some(MeasureEntry::FiguredBass(parse_figured_bass(child))),
            "print" => Some(MeasureEntry::Print(parse_print(child))),
            "sound" => Some(MeasureEntry::Sound(parse_sound(child))),
            "grouping" => Some(MeasureEntry::Grouping(parse_grouping(child))),
            "link" => Some(MeasureEntry::Link(parse_link(child)?)),
            "bookmark" => Some(MeasureEntry::Bookmark(Bookmark {
                id: attr_string(child, "id")
                    .ok_or_else(|| Error::MissingElement("bookmark id".to_string()))?,
                name: attr_string(child, "name"),
            })),
            other => {
                debug!("skipping measure element <{}>", other);
                None
            }
        };
        if let Some(entry) = entry {
            measure.push(entry);
        }
    }
    Ok(measure)
}

// ---------------------------------------------------------------------------
// notes
// ---------------------------------------------------------------------------

fn parse_note(node: Node) -> Result<Note> {
    let kind = if let Some(rest) = get_child(node, "rest") {
        NoteKind::Rest(Rest {
            display_step: parse_display_step(rest)?,
            display_octave: child_value(rest, "display-octave"),
            measure: attr_yes_no(rest, "measure").unwrap_or(false),
        })
    } else if let Some(unpitched) = get_child(node, "unpitched") {
        NoteKind::Unpitched(Unpitched {
            display_step: parse_display_step(unpitched)?,
            display_octave: child_value(unpitched, "display-octave"),
        })
    } else if let Some(pitch) = get_child(node, "pitch") {
        NoteKind::Pitched(PitchedNote::new(parse_pitch(pitch)?)?)
    } else {
        return Err(Error::MissingElement("note pitch, rest, or unpitched".to_string()));
    };

    // Grace notes carry no duration
    let duration = child_value(node, "duration").unwrap_or(0);
    let mut note = Note::from_parts(kind, duration);

    note.chord = get_child(node, "chord").is_some();
    note.cue = get_child(node, "cue").is_some();
    note.grace = get_child(node, "grace").map(|grace| Grace {
        slash: attr_yes_no(grace, "slash").unwrap_or(false),
    });
    note.voice = get_child_text(node, "voice");
    note.note_type = get_child_text(node, "type")
        .as_deref()
        .and_then(NoteTypeValue::from_name);
    note.dots = elements(node).filter(|n| n.tag_name().name() == "dot").count() as u8;
    note.accidental = get_child_text(node, "accidental")
        .as_deref()
        .and_then(Accidental::from_name);
    note.staff = get_child_text(node, "staff");
    note.instrument = get_child(node, "instrument").and_then(|n| attr_string(n, "id"));
    note.dynamics = attr_value(node, "dynamics");
    note.end_dynamics = attr_value(node, "end-dynamics");
    note.attack = attr_value(node, "attack");
    note.release = attr_value(node, "release");
    note.pizzicato = attr_yes_no(node, "pizzicato");

    if let Some(time_mod) = get_child(node, "time-modification") {
        note.time_modification = Some(TimeModification {
            actual_notes: child_value(time_mod, "actual-notes").unwrap_or(1),
            normal_notes: child_value(time_mod, "normal-notes").unwrap_or(1),
            normal_type: get_child_text(time_mod, "normal-type")
                .as_deref()
                .and_then(NoteTypeValue::from_name),
        });
    }
    note.stem = get_child_text(node, "stem").as_deref().and_then(Stem::from_name);
    note.notehead = get_child_text(node, "notehead");

    for child in elements(node) {
        match child.tag_name().name() {
            "tie" => {
                if let Some(tie_type) =
                    attr_string(child, "type").as_deref().and_then(StartStop::from_name)
                {
                    note.ties.push(tie_type);
                }
            }
            "beam" => {
                if let Some(value) = get_text(child).as_deref().and_then(BeamValue::from_name) {
                    note.beams.push(Beam {
                        number: attr_value(child, "number").unwrap_or(1),
                        value,
                    });
                }
            }
            "notations" => note.notations.push(parse_notations(child)),
            "lyric" => note.lyrics.push(parse_lyric(child)),
            _ => {}
        }
    }
    Ok(note)
}

fn parse_display_step(node: Node) -> Result<Option<Step>> {
    match get_child_text(node, "display-step") {
        Some(text) => Ok(Some(Step::from_letter(&text)?)),
        None => Ok(None),
    }
}

fn parse_pitch(node: Node) -> Result<Pitch> {
    let step = Step::from_letter(&required_child_text(node, "step")?)?;
    let alter: f32 = child_value(node, "alter").unwrap_or(0.0);
    let octave: i8 = required_child_text(node, "octave")?
        .parse()
        .map_err(|_| Error::Xml("octave is not an integer".to_string()))?;
    Ok(Pitch::new(step, alter, octave))
}

fn parse_lyric(node: Node) -> Lyric {
    Lyric {
        number: attr_string(node, "number"),
        placement: attr_string(node, "placement")
            .as_deref()
            .and_then(Placement::from_name),
        syllabic: get_child_text(node, "syllabic")
            .as_deref()
            .and_then(Syllabic::from_name),
        text: get_child_text(node, "text").unwrap_or_default(),
        extend: get_child(node, "extend").is_some(),
    }
}

// ---------------------------------------------------------------------------
// notations
// ---------------------------------------------------------------------------

fn placed(node: Node) -> Placed {
    Placed {
        placement: attr_string(node, "placement")
            .as_deref()
            .and_then(Placement::from_name),
    }
}

fn parse_notations(node: Node) -> Notations {
    let mut notations = Notations::default();
    for child in elements(node) {
        let item = match child.tag_name().name() {
            "tied" => attr_string(child, "type")
                .as_deref()
                .and_then(StartStopContinue::from_name)
                .map(|tied_type| Notation::Tied { tied_type }),
            "slur" => attr_string(child, "type")
                .as_deref()
                .and_then(StartStopContinue::from_name)
                .map(|slur_type| Notation::Slur {
                    slur_type,
                    number: attr_value(child, "number").unwrap_or(1),
                    placed: placed(child),
                }),
            "tuplet" => attr_string(child, "type")
                .as_deref()
                .and_then(StartStop::from_name)
                .map(|tuplet_type| Notation::Tuplet {
                    tuplet_type,
                    number: attr_value(child, "number"),
                    bracket: attr_yes_no(child, "bracket"),
                }),
            "glissando" => attr_string(child, "type")
                .as_deref()
                .and_then(StartStop::from_name)
                .map(|gliss_type| Notation::Glissando {
                    gliss_type,
                    text: get_text(child),
                }),
            "fermata" => Some(Notation::Fermata {
                shape: get_text(child),
                inverted: attr_string(child, "type").as_deref() == Some("inverted"),
            }),
            "arpeggiate" => Some(Notation::Arpeggiate {
                direction: attr_string(child, "direction")
                    .as_deref()
                    .and_then(UpDown::from_name),
            }),
            "ornaments" => Some(Notation::Ornaments(parse_ornaments(child))),
            "articulations" => Some(Notation::Articulations(parse_articulations(child))),
            "technical" => Some(Notation::Technical(parse_technical(child))),
            other => {
                debug!("skipping notation <{}>", other);
                None
            }
        };
        if let Some(item) = item {
            notations.items.push(item);
        }
    }
    notations
}

fn parse_ornaments(node: Node) -> Vec<Ornament> {
    let mut ornaments = Vec::new();
    for child in elements(node) {
        let ornament = match child.tag_name().name() {
            "trill-mark" => Some(Ornament::TrillMark(placed(child))),
            "turn" => Some(Ornament::Turn(placed(child))),
            "delayed-turn" => Some(Ornament::DelayedTurn(placed(child))),
            "inverted-turn" => Some(Ornament::InvertedTurn(placed(child))),
            "shake" => Some(Ornament::Shake(placed(child))),
            "wavy-line" => attr_string(child, "type")
                .as_deref()
                .and_then(StartStopContinue::from_name)
                .map(|line_type| Ornament::WavyLine {
                    line_type,
                    placed: placed(child),
                }),
            "mordent" => Some(Ornament::Mordent(MordentAttrs {
                placed: placed(child),
                long: attr_yes_no(child, "long").unwrap_or(false),
            })),
            "inverted-mordent" => Some(Ornament::InvertedMordent(MordentAttrs {
                placed: placed(child),
                long: attr_yes_no(child, "long").unwrap_or(false),
            })),
            "schleifer" => Some(Ornament::Schleifer(placed(child))),
            "tremolo" => get_text(child)
                .and_then(|marks| marks.parse().ok())
                .map(|marks| Ornament::Tremolo { marks }),
            "accidental-mark" => get_text(child).map(Ornament::AccidentalMark),
            other => {
                debug!("skipping ornament <{}>", other);
                None
            }
        };
        if let Some(ornament) = ornament {
            ornaments.push(ornament);
        }
    }
    ornaments
}

fn parse_articulations(node: Node) -> Vec<Articulation> {
    let mut articulations = Vec::new();
    for child in elements(node) {
        let articulation = match child.tag_name().name() {
            "accent" => Some(Articulation::Accent(placed(child))),
            "strong-accent" => Some(Articulation::StrongAccent {
                placed: placed(child),
                direction: attr_string(child, "type")
                    .as_deref()
                    .and_then(UpDown::from_name)
                    .unwrap_or(UpDown::Up),
            }),
            "staccato" => Some(Articulation::Staccato(placed(child))),
            "tenuto" => Some(Articulation::Tenuto(placed(child))),
            "detached-legato" => Some(Articulation::DetachedLegato(placed(child))),
            "staccatissimo" => Some(Articulation::Staccatissimo(placed(child))),
            "spiccato" => Some(Articulation::Spiccato(placed(child))),
            "scoop" => Some(Articulation::Scoop(placed(child))),
            "plop" => Some(Articulation::Plop(placed(child))),
            "doit" => Some(Articulation::Doit(placed(child))),
            "falloff" => Some(Articulation::Falloff(placed(child))),
            "breath-mark" => Some(Articulation::BreathMark(placed(child))),
            "caesura" => Some(Articulation::Caesura(placed(child))),
            "stress" => Some(Articulation::Stress(placed(child))),
            "unstress" => Some(Articulation::Unstress(placed(child))),
            other => {
                debug!("skipping articulation <{}>", other);
                None
            }
        };
        if let Some(articulation) = articulation {
            articulations.push(articulation);
        }
    }
    articulations
}

fn parse_technical(node: Node) -> Vec<Technical> {
    let mut technical = Vec::new();
    for child in elements(node) {
        let item = match child.tag_name().name() {
            "up-bow" => Some(Technical::UpBow(placed(child))),
            "down-bow" => Some(Technical::DownBow(placed(child))),
            "harmonic" => Some(Technical::Harmonic(placed(child))),
            "open-string" => Some(Technical::OpenString(placed(child))),
            "thumb-position" => Some(Technical::ThumbPosition(placed(child))),
            "fingering" => Some(Technical::Fingering {
                text: get_text(child).unwrap_or_default(),
                substitution: attr_yes_no(child, "substitution").unwrap_or(false),
            }),
            "pluck" => Some(Technical::Pluck(get_text(child).unwrap_or_default())),
            "double-tongue" => Some(Technical::DoubleTongue(placed(child))),
            "triple-tongue" => Some(Technical::TripleTongue(placed(child))),
            "stopped" => Some(Technical::Stopped(placed(child))),
            "snap-pizzicato" => Some(Technical::SnapPizzicato(placed(child))),
            "fret" => get_text(child).and_then(|v| v.parse().ok()).map(Technical::Fret),
            "string" => get_text(child)
                .and_then(|v| v.parse().ok())
                .map(Technical::StringNumber),
            "heel" => Some(Technical::Heel(placed(child))),
            "toe" => Some(Technical::Toe(placed(child))),
            "fingernails" => Some(Technical::Fingernails(placed(child))),
            other => {
                debug!("skipping technical mark <{}>", other);
                None
            }
        };
        if let Some(item) = item {
            technical.push(item);
        }
    }
    technical
}

// ---------------------------------------------------------------------------
// attributes, directions, barlines
// ---------------------------------------------------------------------------

fn parse_attributes(node: Node) -> Attributes {
    let mut attributes = Attributes {
        divisions: child_value(node, "divisions"),
        staves: child_value(node, "staves"),
        instruments: child_value(node, "instruments"),
        ..Attributes::default()
    };

    if let Some(key) = get_child(node, "key") {
        attributes.key = Some(Key {
            fifths: child_value(key, "fifths").unwrap_or(0),
            mode: get_child_text(key, "mode").as_deref().and_then(Mode::from_name),
        });
    }
    if let Some(time) = get_child(node, "time") {
        attributes.time = Some(Time {
            beats: get_child_text(time, "beats").unwrap_or_default(),
            beat_type: get_child_text(time, "beat-type").unwrap_or_default(),
            senza_misura: get_child(time, "senza-misura").is_some(),
        });
    }
    for child in elements(node) {
        if child.tag_name().name() == "clef" {
            attributes.clefs.push(Clef {
                number: attr_value(child, "number"),
                sign: get_child_text(child, "sign")
                    .as_deref()
                    .and_then(ClefSign::from_name)
                    .unwrap_or(ClefSign::G),
                line: child_value(child, "line"),
                clef_octave_change: child_value(child, "clef-octave-change"),
            });
        }
    }
    if let Some(transpose) = get_child(node, "transpose") {
        attributes.transpose = Some(Transpose {
            diatonic: child_value(transpose, "diatonic"),
            chromatic: child_value(transpose, "chromatic").unwrap_or(0),
            octave_change: child_value(transpose, "octave-change"),
        });
    }
    attributes
}

fn parse_direction(node: Node) -> Direction {
    let mut direction = Direction {
        placement: attr_string(node, "placement")
            .as_deref()
            .and_then(Placement::from_name),
        offset: child_value(node, "offset"),
        voice: get_child_text(node, "voice"),
        staff: get_child_text(node, "staff"),
        sound: get_child(node, "sound").map(parse_sound),
        ..Direction::default()
    };
    for child in elements(node) {
        if child.tag_name().name() == "direction-type" {
            for inner in elements(child) {
                if let Some(direction_type) = parse_direction_type(inner) {
                    direction.direction_types.push(direction_type);
                }
            }
        }
    }
    direction
}

fn parse_direction_type(node: Node) -> Option<DirectionType> {
    match node.tag_name().name() {
        "words" => get_text(node).map(|text| {
            DirectionType::Words(FormattedText {
                text,
                lang: attr_string(node, "lang"),
            })
        }),
        "dynamics" => {
            let marks = elements(node)
                .map(|mark| DynamicMark::from_name(mark.tag_name().name()))
                .collect();
            Some(DirectionType::Dynamics(Dynamics { marks }))
        }
        "wedge" => attr_string(node, "type")
            .as_deref()
            .and_then(WedgeType::from_name)
            .map(|wedge_type| {
                DirectionType::Wedge(Wedge {
                    wedge_type,
                    number: attr_value(node, "number"),
                    spread: attr_value(node, "spread"),
                })
            }),
        "metronome" => {
            let beat_unit = get_child_text(node, "beat-unit")
                .as_deref()
                .and_then(NoteTypeValue::from_name)?;
            Some(DirectionType::Metronome(Metronome {
                beat_unit,
                beat_unit_dot: get_child(node, "beat-unit-dot").is_some(),
                per_minute: get_child_text(node, "per-minute").unwrap_or_default(),
            }))
        }
        "segno" => Some(DirectionType::Segno),
        "coda" => Some(DirectionType::Coda),
        "rehearsal" => get_text(node).map(DirectionType::Rehearsal),
        "octave-shift" => attr_string(node, "type")
            .as_deref()
            .and_then(OctaveShiftType::from_name)
            .map(|shift_type| DirectionType::OctaveShift {
                shift_type,
                size: attr_value(node, "size").unwrap_or(8),
            }),
        "pedal" => attr_string(node, "type")
            .as_deref()
            .and_then(PedalType::from_name)
            .map(|pedal_type| DirectionType::Pedal {
                pedal_type,
                line: attr_yes_no(node, "line").unwrap_or(false),
            }),
        "dashes" => attr_string(node, "type")
            .as_deref()
            .and_then(StartStop::from_name)
            .map(|dashes_type| DirectionType::Dashes {
                dashes_type,
                number: attr_value(node, "number"),
            }),
        "bracket" => attr_string(node, "type")
            .as_deref()
            .and_then(StartStop::from_name)
            .map(|bracket_type| DirectionType::Bracket {
                bracket_type,
                number: attr_value(node, "number"),
                line_end: attr_string(node, "line-end"),
            }),
        other => {
            debug!("skipping direction-type <{}>", other);
            None
        }
    }
}

fn parse_sound(node: Node) -> Sound {
    Sound {
        tempo: attr_value(node, "tempo"),
        dynamics: attr_value(node, "dynamics"),
        dacapo: attr_yes_no(node, "dacapo").unwrap_or(false),
        segno: attr_string(node, "segno"),
        coda: attr_string(node, "coda"),
        fine: attr_string(node, "fine"),
        tocoda: attr_string(node, "tocoda"),
        pizzicato: attr_yes_no(node, "pizzicato"),
    }
}

fn parse_barline(node: Node) -> Barline {
    Barline {
        location: attr_string(node, "location")
            .as_deref()
            .and_then(BarlineLocation::from_name),
        bar_style: get_child_text(node, "bar-style")
            .as_deref()
            .and_then(BarStyle::from_name),
        repeat: get_child(node, "repeat").and_then(|repeat| {
            attr_string(repeat, "direction")
                .as_deref()
                .and_then(BackwardForward::from_name)
                .map(|direction| Repeat {
                    direction,
                    times: attr_value(repeat, "times"),
                })
        }),
        ending: get_child(node, "ending").and_then(|ending| {
            let number = attr_string(ending, "number")?;
            let ending_type = attr_string(ending, "type")
                .as_deref()
                .and_then(EndingType::from_name)?;
            Some(Ending {
                number,
                ending_type,
                text: get_text(ending),
            })
        }),
    }
}

// ---------------------------------------------------------------------------
// harmony and friends
// ---------------------------------------------------------------------------

fn parse_harmony(node: Node) -> Result<Harmony> {
    let root = match get_child(node, "root") {
        Some(root) => Some(Root {
            step: Step::from_letter(&required_child_text(root, "root-step")?)?,
            alter: child_value(root, "root-alter"),
        }),
        None => None,
    };
    let bass = match get_child(node, "bass") {
        Some(bass) => Some(Bass {
            step: Step::from_letter(&required_child_text(bass, "bass-step")?)?,
            alter: child_value(bass, "bass-alter"),
        }),
        None => None,
    };

    let mut degrees = Vec::new();
    for child in elements(node) {
        if child.tag_name().name() == "degree" {
            if let (Some(value), Some(degree_type)) = (
                child_value(child, "degree-value"),
                get_child_text(child, "degree-type")
                    .as_deref()
                    .and_then(DegreeType::from_name),
            ) {
                degrees.push(Degree {
                    value,
                    alter: child_value(child, "degree-alter"),
                    degree_type,
                });
            }
        }
    }

    Ok(Harmony {
        root,
        function: get_child_text(node, "function"),
        kind: get_child_text(node, "kind").unwrap_or_default(),
        bass,
        degrees,
        frame: get_child(node, "frame").map(parse_frame),
    })
}

fn parse_frame(node: Node) -> Frame {
    let mut frame = Frame {
        strings: child_value(node, "frame-strings").unwrap_or(6),
        frets: child_value(node, "frame-frets").unwrap_or(4),
        first_fret: child_value(node, "first-fret"),
        notes: Vec::new(),
    };
    for child in elements(node) {
        if child.tag_name().name() == "frame-note" {
            if let (Some(string), Some(fret)) =
                (child_value(child, "string"), child_value(child, "fret"))
            {
                frame.notes.push(FrameNote {
                    string,
                    fret,
                    fingering: get_child_text(child, "fingering"),
                });
            }
        }
    }
    frame
}

fn parse_figured_bass(node: Node) -> FiguredBass {
    let mut figured = FiguredBass {
        duration: child_value(node, "duration"),
        parentheses: attr_yes_no(node, "parentheses").unwrap_or(false),
        ..FiguredBass::default()
    };
    for child in elements(node) {
        if child.tag_name().name() == "figure" {
            figured.figures.push(Figure {
                prefix: get_child_text(child, "prefix"),
                number: get_child_text(child, "figure-number"),
                suffix: get_child_text(child, "suffix"),
            });
        }
    }
    figured
}

fn parse_print(node: Node) -> Print {
    let mut print = Print {
        new_system: attr_yes_no(node, "new-system"),
        new_page: attr_yes_no(node, "new-page"),
        blank_page: attr_value(node, "blank-page"),
        page_number: attr_string(node, "page-number"),
        page_layout: get_child(node, "page-layout").map(parse_page_layout),
        system_layout: get_child(node, "system-layout").map(parse_system_layout),
        staff_layouts: Vec::new(),
    };
    for child in elements(node) {
        if child.tag_name().name() == "staff-layout" {
            print.staff_layouts.push(parse_staff_layout(child));
        }
    }
    print
}

fn parse_grouping(node: Node) -> Grouping {
    let mut grouping = Grouping {
        grouping_type: attr_string(node, "type")
            .as_deref()
            .and_then(StartStopSingle::from_name)
            .unwrap_or(StartStopSingle::Single),
        number: attr_string(node, "number"),
        features: Vec::new(),
    };
    for child in elements(node) {
        if child.tag_name().name() == "feature" {
            grouping.features.push(Feature {
                feature_type: attr_string(child, "type"),
                value: get_text(child).unwrap_or_default(),
            });
        }
    }
    grouping
}

fn parse_link(node: Node) -> Result<Link> {
    Ok(Link {
        href: attr_string(node, "href")
            .ok_or_else(|| Error::MissingElement("link href".to_string()))?,
        name: attr_string(node, "name"),
        element: attr_string(node, "element"),
        position: attr_value(node, "position"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_partwise_root() {
        let err = read_document("<score-timewise version=\"2.0\"/>").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_rejects_malformed_xml() {
        let err = read_document("<score-partwise><oops").unwrap_err();
        assert!(matches!(err, Error::Xml(_)));
    }

    #[test]
    fn test_requires_part_list() {
        let err = read_document("<score-partwise version=\"2.0\"></score-partwise>").unwrap_err();
        assert!(matches!(err, Error::MissingElement(_)));
    }

    #[test]
    fn test_reads_minimal_score() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 2.0 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">
<score-partwise version="2.0">
  <part-list>
    <score-part id="P1"><part-name>Voice</part-name></score-part>
  </part-list>
  <part id="P1">
    <measure number="1">
      <attributes>
        <divisions>4</divisions>
        <key><fifths>0</fifths><mode>major</mode></key>
        <time><beats>4</beats><beat-type>4</beat-type></time>
        <clef><sign>G</sign><line>2</line></clef>
      </attributes>
      <note>
        <pitch><step>C</step><octave>4</octave></pitch>
        <duration>4</duration>
        <voice>1</voice>
        <type>quarter</type>
        <staff>1</staff>
      </note>
      <note>
        <rest/>
        <duration>4</duration>
      </note>
    </measure>
  </part>
</score-partwise>"#;

        let score = read_document(xml).expect("minimal score should parse");
        assert_eq!(score.version, "2.0");
        assert_eq!(score.parts.len(), 1);

        let measure = &score.parts[0].measures[0];
        let notes: Vec<&Note> = measure.notes().collect();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].midi(), Some(60));
        assert_eq!(notes[0].staff.as_deref(), Some("1"));
        assert!(notes[1].is_rest());
    }

    #[test]
    fn test_invalid_step_surfaces() {
        let xml = r#"<score-partwise version="2.0">
  <part-list>
    <score-part id="P1"><part-name>X</part-name></score-part>
  </part-list>
  <part id="P1">
    <measure number="1">
      <note><pitch><step>Q</step><octave>4</octave></pitch><duration>4</duration></note>
    </measure>
  </part>
</score-partwise>"#;

        let err = read_document(xml).unwrap_err();
        assert!(matches!(err, Error::InvalidStep(step) if step == "Q"));
    }

    #[test]
    fn test_reads_header_defaults() {
        let xml = r#"<score-partwise version="2.0">
  <work>
    <work-title>Suite</work-title>
    <opus xmlns:xlink="http://www.w3.org/1999/xlink" xlink:href="suite.xml"/>
  </work>
  <defaults>
    <scaling><millimeters>7.2</millimeters><tenths>40</tenths></scaling>
    <appearance>
      <line-width type="stem">0.9</line-width>
      <note-size type="grace">60</note-size>
    </appearance>
  </defaults>
  <part-list>
    <score-part id="P1"><part-name>X</part-name></score-part>
  </part-list>
  <part id="P1">
    <measure number="1">
      <print new-system="yes" blank-page="1"/>
    </measure>
  </part>
</score-partwise>"#;

        let score = read_document(xml).expect("header should parse");
        assert_eq!(score.work.as_ref().unwrap().opus.as_deref(), Some("suite.xml"));

        let defaults = score.defaults.as_ref().unwrap();
        assert_eq!(defaults.scaling.as_ref().unwrap().tenths, 40.0);
        let appearance = defaults.appearance.as_ref().unwrap();
        assert_eq!(appearance.line_widths[0].line_type, "stem");
        assert_eq!(appearance.note_sizes[0].value, 60.0);

        match &score.parts[0].measures[0].entries[0] {
            MeasureEntry::Print(print) => {
                assert_eq!(print.new_system, Some(true));
                assert_eq!(print.blank_page, Some(1));
            }
            other => panic!("expected a print entry, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        let xml = r#"<score-partwise version="2.0">
  <part-list>
    <score-part id="P1"><part-name>X</part-name></score-part>
  </part-list>
  <part id="P1">
    <measure number="1">
      <listening><sync type="none"/></listening>
      <note><rest/><duration>4</duration></note>
    </measure>
  </part>
</score-partwise>"#;

        let score = read_document(xml).expect("unknown elements should not fail the parse");
        assert_eq!(score.parts[0].measures[0].entries.len(), 1);
    }
}
