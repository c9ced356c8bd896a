//! MusicXML writer: indented, escaped string emission
//!
//! Field order follows the schema order of the model so written documents
//! read back into the same graph.

use crate::models::attributes::Attributes;
use crate::models::barline::Barline;
use crate::models::direction::{Direction, DirectionType, Sound};
use crate::models::harmony::{FiguredBass, Harmony};
use crate::models::layout::{Appearance, PageLayout, Print, StaffLayout, SystemLayout};
use crate::models::measure::{Bookmark, Forward, Grouping, Link, Measure, MeasureEntry};
use crate::models::notations::{Articulation, Notation, Notations, Ornament, Placed, Technical};
use crate::models::note::{Lyric, Note, NoteKind, Rest, Unpitched};
use crate::models::score::{
    Credit, Defaults, Identification, PartListEntry, ScorePartwise,
};
use crate::models::common::Font;

use super::DOCTYPE;

/// Render a score as XML text with the partwise DOCTYPE header.
pub fn write_document(score: &ScorePartwise) -> String {
    let mut w = XmlWriter::new();
    w.raw("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
    w.raw(DOCTYPE);

    w.open_attrs("score-partwise", &[("version", score.version.clone())]);

    if let Some(work) = &score.work {
        w.open("work");
        w.leaf_opt("work-number", work.work_number.as_deref());
        w.leaf_opt("work-title", work.work_title.as_deref());
        if let Some(opus) = &work.opus {
            w.empty_attrs(
                "opus",
                &[
                    ("xmlns:xlink", "http://www.w3.org/1999/xlink".to_string()),
                    ("xlink:href", opus.clone()),
                ],
            );
        }
        w.close("work");
    }
    w.leaf_opt("movement-number", score.movement_number.as_deref());
    w.leaf_opt("movement-title", score.movement_title.as_deref());
    if let Some(identification) = &score.identification {
        write_identification(&mut w, identification);
    }
    if let Some(defaults) = &score.defaults {
        write_defaults(&mut w, defaults);
    }
    for credit in &score.credits {
        write_credit(&mut w, credit);
    }
    write_part_list(&mut w, score);
    for part in &score.parts {
        w.open_attrs("part", &[("id", part.id.clone())]);
        for measure in &part.measures {
            write_measure(&mut w, measure);
        }
        w.close("part");
    }

    w.close("score-partwise");
    w.finish()
}

// ---------------------------------------------------------------------------
// emission plumbing
// ---------------------------------------------------------------------------

struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    fn new() -> XmlWriter {
        XmlWriter { out: String::new(), depth: 0 }
    }

    fn raw(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, tag: &str) {
        self.line(&format!("<{}>", tag));
        self.depth += 1;
    }

    fn open_attrs(&mut self, tag: &str, attrs: &[(&str, String)]) {
        self.line(&format!("<{}{}>", tag, format_attrs(attrs)));
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth -= 1;
        self.line(&format!("</{}>", tag));
    }

    fn leaf(&mut self, tag: &str, text: &str) {
        self.line(&format!("<{}>{}</{}>", tag, xml_escape(text), tag));
    }

    fn leaf_opt(&mut self, tag: &str, text: Option<&str>) {
        if let Some(text) = text {
            self.leaf(tag, text);
        }
    }

    fn leaf_attrs(&mut self, tag: &str, attrs: &[(&str, String)], text: &str) {
        self.line(&format!(
            "<{}{}>{}</{}>",
            tag,
            format_attrs(attrs),
            xml_escape(text),
            tag
        ));
    }

    fn empty(&mut self, tag: &str) {
        self.line(&format!("<{}/>", tag));
    }

    fn empty_attrs(&mut self, tag: &str, attrs: &[(&str, String)]) {
        self.line(&format!("<{}{}/>", tag, format_attrs(attrs)));
    }

    fn finish(self) -> String {
        self.out
    }
}

fn format_attrs(attrs: &[(&str, String)]) -> String {
    let mut out = String::new();
    for (name, value) in attrs {
        out.push_str(&format!(" {}=\"{}\"", name, xml_escape(value)));
    }
    out
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Integral floats print without a fraction so 1.0 comes out as "1".
fn num(value: f32) -> String {
    if value == value.trunc() && value.abs() < 1e9 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ---------------------------------------------------------------------------
// score header
// ---------------------------------------------------------------------------

fn write_identification(w: &mut XmlWriter, identification: &Identification) {
    w.open("identification");
    for creator in &identification.creators {
        match &creator.creator_type {
            Some(creator_type) => {
                w.leaf_attrs("creator", &[("type", creator_type.clone())], &creator.name)
            }
            None => w.leaf("creator", &creator.name),
        }
    }
    for rights in &identification.rights {
        w.leaf("rights", rights);
    }
    if let Some(encoding) = &identification.encoding {
        w.open("encoding");
        for software in &encoding.software {
            w.leaf("software", software);
        }
        w.leaf_opt("encoding-date", encoding.encoding_date.as_deref());
        for supports in &encoding.supports {
            w.empty_attrs(
                "supports",
                &[
                    ("element", supports.element.clone()),
                    ("type", yes_no(supports.supported).to_string()),
                ],
            );
        }
        w.close("encoding");
    }
    w.leaf_opt("source", identification.source.as_deref());
    if !identification.miscellaneous.is_empty() {
        w.open("miscellaneous");
        for field in &identification.miscellaneous {
            w.leaf_attrs(
                "miscellaneous-field",
                &[("name", field.name.clone())],
                &field.value,
            );
        }
        w.close("miscellaneous");
    }
    w.close("identification");
}

fn write_defaults(w: &mut XmlWriter, defaults: &Defaults) {
    w.open("defaults");
    if let Some(scaling) = &defaults.scaling {
        w.open("scaling");
        w.leaf("millimeters", &num(scaling.millimeters));
        w.leaf("tenths", &num(scaling.tenths));
        w.close("scaling");
    }
    if let Some(page_layout) = &defaults.page_layout {
        write_page_layout(w, page_layout);
    }
    if let Some(system_layout) = &defaults.system_layout {
        write_system_layout(w, system_layout);
    }
    for staff_layout in &defaults.staff_layouts {
        write_staff_layout(w, staff_layout);
    }
    if let Some(appearance) = &defaults.appearance {
        write_appearance(w, appearance);
    }
    if let Some(font) = &defaults.music_font {
        write_font(w, "music-font", font);
    }
    if let Some(font) = &defaults.word_font {
        write_font(w, "word-font", font);
    }
    for font in &defaults.lyric_fonts {
        write_font(w, "lyric-font", font);
    }
    w.close("defaults");
}

fn write_font(w: &mut XmlWriter, tag: &str, font: &Font) {
    let mut attrs = Vec::new();
    if let Some(family) = &font.font_family {
        attrs.push(("font-family", family.clone()));
    }
    if let Some(size) = &font.font_size {
        attrs.push(("font-size", size.clone()));
    }
    w.empty_attrs(tag, &attrs);
}

fn write_page_layout(w: &mut XmlWriter, layout: &PageLayout) {
    w.open("page-layout");
    if let Some(height) = layout.page_height {
        w.leaf("page-height", &num(height));
    }
    if let Some(width) = layout.page_width {
        w.leaf("page-width", &num(width));
    }
    for margins in &layout.margins {
        match &margins.margin_type {
            Some(margin_type) => {
                w.open_attrs("page-margins", &[("type", margin_type.clone())])
            }
            None => w.open("page-margins"),
        }
        w.leaf("left-margin", &num(margins.left));
        w.leaf("right-margin", &num(margins.right));
        w.leaf("top-margin", &num(margins.top));
        w.leaf("bottom-margin", &num(margins.bottom));
        w.close("page-margins");
    }
    w.close("page-layout");
}

fn write_system_layout(w: &mut XmlWriter, layout: &SystemLayout) {
    w.open("system-layout");
    if let Some(margins) = &layout.system_margins {
        w.open("system-margins");
        w.leaf("left-margin", &num(margins.left));
        w.leaf("right-margin", &num(margins.right));
        w.close("system-margins");
    }
    if let Some(distance) = layout.system_distance {
        w.leaf("system-distance", &num(distance));
    }
    if let Some(distance) = layout.top_system_distance {
        w.leaf("top-system-distance", &num(distance));
    }
    w.close("system-layout");
}

fn write_appearance(w: &mut XmlWriter, appearance: &Appearance) {
    w.open("appearance");
    for line_width in &appearance.line_widths {
        w.leaf_attrs(
            "line-width",
            &[("type", line_width.line_type.clone())],
            &num(line_width.value),
        );
    }
    for note_size in &appearance.note_sizes {
        w.leaf_attrs(
            "note-size",
            &[("type", note_size.size_type.clone())],
            &num(note_size.value),
        );
    }
    w.close("appearance");
}

fn write_staff_layout(w: &mut XmlWriter, layout: &StaffLayout) {
    match layout.number {
        Some(number) => w.open_attrs("staff-layout", &[("number", number.to_string())]),
        None => w.open("staff-layout"),
    }
    if let Some(distance) = layout.staff_distance {
        w.leaf("staff-distance", &num(distance));
    }
    w.close("staff-layout");
}

fn write_credit(w: &mut XmlWriter, credit: &Credit) {
    match credit.page {
        Some(page) => w.open_attrs("credit", &[("page", page.to_string())]),
        None => w.open("credit"),
    }
    for credit_type in &credit.credit_types {
        w.leaf("credit-type", credit_type);
    }
    for words in &credit.credit_words {
        let mut attrs = Vec::new();
        if let Some(x) = words.default_x {
            attrs.push(("default-x", num(x)));
        }
        if let Some(y) = words.default_y {
            attrs.push(("default-y", num(y)));
        }
        if let Some(size) = &words.font_size {
            attrs.push(("font-size", size.clone()));
        }
        if let Some(justify) = &words.justify {
            attrs.push(("justify", justify.clone()));
        }
        w.leaf_attrs("credit-words", &attrs, &words.text);
    }
    w.close("credit");
}

fn write_part_list(w: &mut XmlWriter, score: &ScorePartwise) {
    w.open("part-list");
    for entry in &score.part_list.entries {
        match entry {
            PartListEntry::PartGroup(group) => {
                let mut attrs = vec![("type", group.group_type.name().to_string())];
                if let Some(number) = &group.number {
                    attrs.push(("number", number.clone()));
                }
                w.open_attrs("part-group", &attrs);
                w.leaf_opt("group-name", group.group_name.as_deref());
                if let Some(symbol) = group.group_symbol {
                    w.leaf("group-symbol", symbol.name());
                }
                if let Some(barline) = group.group_barline {
                    w.leaf("group-barline", yes_no(barline));
                }
                w.close("part-group");
            }
            PartListEntry::ScorePart(part) => {
                w.open_attrs("score-part", &[("id", part.id.clone())]);
                w.leaf("part-name", &part.part_name);
                w.leaf_opt("part-abbreviation", part.part_abbreviation.as_deref());
                for instrument in &part.score_instruments {
                    w.open_attrs("score-instrument", &[("id", instrument.id.clone())]);
                    w.leaf("instrument-name", &instrument.instrument_name);
                    w.close("score-instrument");
                }
                for instrument in &part.midi_instruments {
                    w.open_attrs("midi-instrument", &[("id", instrument.id.clone())]);
                    if let Some(channel) = instrument.midi_channel {
                        w.leaf("midi-channel", &channel.to_string());
                    }
                    if let Some(program) = instrument.midi_program {
                        w.leaf("midi-program", &program.to_string());
                    }
                    if let Some(volume) = instrument.volume {
                        w.leaf("volume", &num(volume));
                    }
                    if let Some(pan) = instrument.pan {
                        w.leaf("pan", &num(pan));
                    }
                    w.close("midi-instrument");
                }
                w.close("score-part");
            }
        }
    }
    w.close("part-list");
}

// ---------------------------------------------------------------------------
// measures
// ---------------------------------------------------------------------------

fn write_measure(w: &mut XmlWriter, measure: &Measure) {
    let mut attrs = vec![("number", measure.number.clone())];
    if let Some(width) = measure.width {
        attrs.push(("width", num(width)));
    }
    if measure.implicit {
        attrs.push(("implicit", "yes".to_string()));
    }
    w.open_attrs("measure", &attrs);

    for entry in &measure.entries {
        match entry {
            MeasureEntry::Note(note) => write_note(w, note),
            MeasureEntry::Backup(backup) => {
                w.open("backup");
                w.leaf("duration", &backup.duration.to_string());
                w.close("backup");
            }
            MeasureEntry::Forward(forward) => write_forward(w, forward),
            MeasureEntry::Attributes(attributes) => write_attributes(w, attributes),
            MeasureEntry::Direction(direction) => write_direction(w, direction),
            MeasureEntry::Barline(barline) => write_barline(w, barline),
            MeasureEntry::Harmony(harmony) => write_harmony(w, harmony),
            MeasureEntry::FiguredBass(figured) => write_figured_bass(w, figured),
            MeasureEntry::Print(print) => write_print(w, print),
            MeasureEntry::Sound(sound) => write_sound(w, sound),
            MeasureEntry::Grouping(grouping) => write_grouping(w, grouping),
            MeasureEntry::Link(link) => write_link(w, link),
            MeasureEntry::Bookmark(bookmark) => write_bookmark(w, bookmark),
        }
    }

    w.close("measure");
}

fn write_forward(w: &mut XmlWriter, forward: &Forward) {
    w.open("forward");
    w.leaf("duration", &forward.duration.to_string());
    w.leaf_opt("voice", forward.voice.as_deref());
    w.leaf_opt("staff", forward.staff.as_deref());
    w.close("forward");
}

// ---------------------------------------------------------------------------
// notes
// ---------------------------------------------------------------------------

fn write_note(w: &mut XmlWriter, note: &Note) {
    let mut attrs = Vec::new();
    if let Some(dynamics) = note.dynamics {
        attrs.push(("dynamics", num(dynamics)));
    }
    if let Some(end_dynamics) = note.end_dynamics {
        attrs.push(("end-dynamics", num(end_dynamics)));
    }
    if let Some(attack) = note.attack {
        attrs.push(("attack", num(attack)));
    }
    if let Some(release) = note.release {
        attrs.push(("release", num(release)));
    }
    if let Some(pizzicato) = note.pizzicato {
        attrs.push(("pizzicato", yes_no(pizzicato).to_string()));
    }
    w.open_attrs("note", &attrs);

    if let Some(grace) = &note.grace {
        if grace.slash {
            w.empty_attrs("grace", &[("slash", "yes".to_string())]);
        } else {
            w.empty("grace");
        }
    }
    if note.cue {
        w.empty("cue");
    }
    if note.chord {
        w.empty("chord");
    }

    match note.kind() {
        NoteKind::Pitched(pitched) => {
            let pitch = pitched.pitch();
            w.open("pitch");
            w.leaf("step", pitch.step.letter());
            if pitch.alter != 0.0 {
                w.leaf("alter", &num(pitch.alter));
            }
            w.leaf("octave", &pitch.octave.to_string());
            w.close("pitch");
        }
        NoteKind::Rest(rest) => write_rest(w, rest),
        NoteKind::Unpitched(unpitched) => write_unpitched(w, unpitched),
    }

    if note.duration() > 0 {
        w.leaf("duration", &note.duration().to_string());
    }
    for tie in &note.ties {
        w.empty_attrs("tie", &[("type", tie.name().to_string())]);
    }
    if let Some(instrument) = &note.instrument {
        w.empty_attrs("instrument", &[("id", instrument.clone())]);
    }
    w.leaf_opt("voice", note.voice.as_deref());
    if let Some(note_type) = note.note_type {
        w.leaf("type", note_type.name());
    }
    for _ in 0..note.dots {
        w.empty("dot");
    }
    if let Some(accidental) = note.accidental {
        w.leaf("accidental", accidental.name());
    }
    if let Some(time_mod) = &note.time_modification {
        w.open("time-modification");
        w.leaf("actual-notes", &time_mod.actual_notes.to_string());
        w.leaf("normal-notes", &time_mod.normal_notes.to_string());
        if let Some(normal_type) = time_mod.normal_type {
            w.leaf("normal-type", normal_type.name());
        }
        w.close("time-modification");
    }
    if let Some(stem) = note.stem {
        w.leaf("stem", stem.name());
    }
    w.leaf_opt("notehead", note.notehead.as_deref());
    w.leaf_opt("staff", note.staff.as_deref());
    for beam in &note.beams {
        w.leaf_attrs("beam", &[("number", beam.number.to_string())], beam.value.name());
    }
    for notations in &note.notations {
        write_notations(w, notations);
    }
    for lyric in &note.lyrics {
        write_lyric(w, lyric);
    }

    w.close("note");
}

fn write_rest(w: &mut XmlWriter, rest: &Rest) {
    let has_display = rest.display_step.is_some() || rest.display_octave.is_some();
    if !has_display && !rest.measure {
        w.empty("rest");
        return;
    }
    let attrs: Vec<(&str, String)> = if rest.measure {
        vec![("measure", "yes".to_string())]
    } else {
        Vec::new()
    };
    if !has_display {
        w.empty_attrs("rest", &attrs);
        return;
    }
    w.open_attrs("rest", &attrs);
    if let Some(step) = rest.display_step {
        w.leaf("display-step", step.letter());
    }
    if let Some(octave) = rest.display_octave {
        w.leaf("display-octave", &octave.to_string());
    }
    w.close("rest");
}

fn write_unpitched(w: &mut XmlWriter, unpitched: &Unpitched) {
    if unpitched.display_step.is_none() && unpitched.display_octave.is_none() {
        w.empty("unpitched");
        return;
    }
    w.open("unpitched");
    if let Some(step) = unpitched.display_step {
        w.leaf("display-step", step.letter());
    }
    if let Some(octave) = unpitched.display_octave {
        w.leaf("display-octave", &octave.to_string());
    }
    w.close("unpitched");
}

fn write_lyric(w: &mut XmlWriter, lyric: &Lyric) {
    let mut attrs = Vec::new();
    if let Some(number) = &lyric.number {
        attrs.push(("number", number.clone()));
    }
    if let Some(placement) = lyric.placement {
        attrs.push(("placement", placement.name().to_string()));
    }
    w.open_attrs("lyric", &attrs);
    if let Some(syllabic) = lyric.syllabic {
        w.leaf("syllabic", syllabic.name());
    }
    w.leaf("text", &lyric.text);
    if lyric.extend {
        w.empty("extend");
    }
    w.close("lyric");
}

// ---------------------------------------------------------------------------
// notations
// ---------------------------------------------------------------------------

fn placed_attrs(placed: &Placed) -> Vec<(&'static str, String)> {
    match placed.placement {
        Some(placement) => vec![("placement", placement.name().to_string())],
        None => Vec::new(),
    }
}

fn write_notations(w: &mut XmlWriter, notations: &Notations) {
    w.open("notations");
    for item in &notations.items {
        match item {
            Notation::Tied { tied_type } => {
                w.empty_attrs("tied", &[("type", tied_type.name().to_string())]);
            }
            Notation::Slur { slur_type, number, placed } => {
                let mut attrs = vec![
                    ("type", slur_type.name().to_string()),
                    ("number", number.to_string()),
                ];
                attrs.extend(placed_attrs(placed));
                w.empty_attrs("slur", &attrs);
            }
            Notation::Tuplet { tuplet_type, number, bracket } => {
                let mut attrs = vec![("type", tuplet_type.name().to_string())];
                if let Some(number) = number {
                    attrs.push(("number", number.to_string()));
                }
                if let Some(bracket) = bracket {
                    attrs.push(("bracket", yes_no(*bracket).to_string()));
                }
                w.empty_attrs("tuplet", &attrs);
            }
            Notation::Glissando { gliss_type, text } => {
                let attrs = [("type", gliss_type.name().to_string())];
                match text {
                    Some(text) => w.leaf_attrs("glissando", &attrs, text),
                    None => w.empty_attrs("glissando", &attrs),
                }
            }
            Notation::Fermata { shape, inverted } => {
                let attrs: Vec<(&str, String)> = if *inverted {
                    vec![("type", "inverted".to_string())]
                } else {
                    Vec::new()
                };
                match shape {
                    Some(shape) => w.leaf_attrs("fermata", &attrs, shape),
                    None => w.empty_attrs("fermata", &attrs),
                }
            }
            Notation::Arpeggiate { direction } => {
                let attrs: Vec<(&str, String)> = match direction {
                    Some(direction) => vec![("direction", direction.name().to_string())],
                    None => Vec::new(),
                };
                w.empty_attrs("arpeggiate", &attrs);
            }
            Notation::Ornaments(ornaments) => write_ornaments(w, ornaments),
            Notation::Articulations(articulations) => write_articulations(w, articulations),
            Notation::Technical(technical) => write_technical(w, technical),
        }
    }
    w.close("notations");
}

fn write_ornaments(w: &mut XmlWriter, ornaments: &[Ornament]) {
    w.open("ornaments");
    for ornament in ornaments {
        match ornament {
            Ornament::TrillMark(placed) => w.empty_attrs("trill-mark", &placed_attrs(placed)),
            Ornament::Turn(placed) => w.empty_attrs("turn", &placed_attrs(placed)),
            Ornament::DelayedTurn(placed) => w.empty_attrs("delayed-turn", &placed_attrs(placed)),
            Ornament::InvertedTurn(placed) => {
                w.empty_attrs("inverted-turn", &placed_attrs(placed))
            }
            Ornament::Shake(placed) => w.empty_attrs("shake", &placed_attrs(placed)),
            Ornament::WavyLine { line_type, placed } => {
                let mut attrs = vec![("type", line_type.name().to_string())];
                attrs.extend(placed_attrs(placed));
                w.empty_attrs("wavy-line", &attrs);
            }
            Ornament::Mordent(mordent) => {
                let mut attrs = placed_attrs(&mordent.placed);
                if mordent.long {
                    attrs.push(("long", "yes".to_string()));
                }
                w.empty_attrs("mordent", &attrs);
            }
            Ornament::InvertedMordent(mordent) => {
                let mut attrs = placed_attrs(&mordent.placed);
                if mordent.long {
                    attrs.push(("long", "yes".to_string()));
                }
                w.empty_attrs("inverted-mordent", &attrs);
            }
            Ornament::Schleifer(placed) => w.empty_attrs("schleifer", &placed_attrs(placed)),
            Ornament::Tremolo { marks } => w.leaf("tremolo", &marks.to_string()),
            Ornament::AccidentalMark(mark) => w.leaf("accidental-mark", mark),
        }
    }
    w.close("ornaments");
}

fn write_articulations(w: &mut XmlWriter, articulations: &[Articulation]) {
    w.open("articulations");
    for articulation in articulations {
        match articulation {
            Articulation::Accent(placed) => w.empty_attrs("accent", &placed_attrs(placed)),
            Articulation::StrongAccent { placed, direction } => {
                let mut attrs = placed_attrs(placed);
                attrs.push(("type", direction.name().to_string()));
                w.empty_attrs("strong-accent", &attrs);
            }
            Articulation::Staccato(placed) => w.empty_attrs("staccato", &placed_attrs(placed)),
            Articulation::Tenuto(placed) => w.empty_attrs("tenuto", &placed_attrs(placed)),
            Articulation::DetachedLegato(placed) => {
                w.empty_attrs("detached-legato", &placed_attrs(placed))
            }
            Articulation::Staccatissimo(placed) => {
                w.empty_attrs("staccatissimo", &placed_attrs(placed))
            }
            Articulation::Spiccato(placed) => w.empty_attrs("spiccato", &placed_attrs(placed)),
            Articulation::Scoop(placed) => w.empty_attrs("scoop", &placed_attrs(placed)),
            Articulation::Plop(placed) => w.empty_attrs("plop", &placed_attrs(placed)),
            Articulation::Doit(placed) => w.empty_attrs("doit", &placed_attrs(placed)),
            Articulation::Falloff(placed) => w.empty_attrs("falloff", &placed_attrs(placed)),
            Articulation::BreathMark(placed) => {
                w.empty_attrs("breath-mark", &placed_attrs(placed))
            }
            Articulation::Caesura(placed) => w.empty_attrs("caesura", &placed_attrs(placed)),
            Articulation::Stress(placed) => w.empty_attrs("stress", &placed_attrs(placed)),
            Articulation::Unstress(placed) => w.empty_attrs("unstress", &placed_attrs(placed)),
        }
    }
    w.close("articulations");
}

fn write_technical(w: &mut XmlWriter, technical: &[Technical]) {
    w.open("technical");
    for item in technical {
        match item {
            Technical::UpBow(placed) => w.empty_attrs("up-bow", &placed_attrs(placed)),
            Technical::DownBow(placed) => w.empty_attrs("down-bow", &placed_attrs(placed)),
            Technical::Harmonic(placed) => w.empty_attrs("harmonic", &placed_attrs(placed)),
            Technical::OpenString(placed) => {
                w.empty_attrs("open-string", &placed_attrs(placed))
            }
            Technical::ThumbPosition(placed) => {
                w.empty_attrs("thumb-position", &placed_attrs(placed))
            }
            Technical::Fingering { text, substitution } => {
                let attrs: Vec<(&str, String)> = if *substitution {
                    vec![("substitution", "yes".to_string())]
                } else {
                    Vec::new()
                };
                w.leaf_attrs("fingering", &attrs, text);
            }
            Technical::Pluck(text) => w.leaf("pluck", text),
            Technical::DoubleTongue(placed) => {
                w.empty_attrs("double-tongue", &placed_attrs(placed))
            }
            Technical::TripleTongue(placed) => {
                w.empty_attrs("triple-tongue", &placed_attrs(placed))
            }
            Technical::Stopped(placed) => w.empty_attrs("stopped", &placed_attrs(placed)),
            Technical::SnapPizzicato(placed) => {
                w.empty_attrs("snap-pizzicato", &placed_attrs(placed))
            }
            Technical::Fret(fret) => w.leaf("fret", &fret.to_string()),
            Technical::StringNumber(string) => w.leaf("string", &string.to_string()),
            Technical::Heel(placed) => w.empty_attrs("heel", &placed_attrs(placed)),
            Technical::Toe(placed) => w.empty_attrs("toe", &placed_attrs(placed)),
            Technical::Fingernails(placed) => {
                w.empty_attrs("fingernails", &placed_attrs(placed))
            }
        }
    }
    w.close("technical");
}

// ---------------------------------------------------------------------------
// attributes, directions, barlines
// ---------------------------------------------------------------------------

fn write_attributes(w: &mut XmlWriter, attributes: &Attributes) {
    w.open("attributes");
    if let Some(divisions) = attributes.divisions {
        w.leaf("divisions", &divisions.to_string());
    }
    if let Some(key) = &attributes.key {
        w.open("key");
        w.leaf("fifths", &key.fifths.to_string());
        if let Some(mode) = key.mode {
            w.leaf("mode", mode.name());
        }
        w.close("key");
    }
    if let Some(time) = &attributes.time {
        w.open("time");
        if time.senza_misura {
            w.empty("senza-misura");
        } else {
            w.leaf("beats", &time.beats);
            w.leaf("beat-type", &time.beat_type);
        }
        w.close("time");
    }
    if let Some(staves) = attributes.staves {
        w.leaf("staves", &staves.to_string());
    }
    if let Some(instruments) = attributes.instruments {
        w.leaf("instruments", &instruments.to_string());
    }
    for clef in &attributes.clefs {
        match clef.number {
            Some(number) => w.open_attrs("clef", &[("number", number.to_string())]),
            None => w.open("clef"),
        }
        w.leaf("sign", clef.sign.name());
        if let Some(line) = clef.line {
            w.leaf("line", &line.to_string());
        }
        if let Some(change) = clef.clef_octave_change {
            w.leaf("clef-octave-change", &change.to_string());
        }
        w.close("clef");
    }
    if let Some(transpose) = &attributes.transpose {
        w.open("transpose");
        if let Some(diatonic) = transpose.diatonic {
            w.leaf("diatonic", &diatonic.to_string());
        }
        w.leaf("chromatic", &transpose.chromatic.to_string());
        if let Some(change) = transpose.octave_change {
            w.leaf("octave-change", &change.to_string());
        }
        w.close("transpose");
    }
    w.close("attributes");
}

fn write_direction(w: &mut XmlWriter, direction: &Direction) {
    let attrs: Vec<(&str, String)> = match direction.placement {
        Some(placement) => vec![("placement", placement.name().to_string())],
        None => Vec::new(),
    };
    w.open_attrs("direction", &attrs);

    for direction_type in &direction.direction_types {
        w.open("direction-type");
        write_direction_type(w, direction_type);
        w.close("direction-type");
    }
    if let Some(offset) = direction.offset {
        w.leaf("offset", &offset.to_string());
    }
    w.leaf_opt("voice", direction.voice.as_deref());
    w.leaf_opt("staff", direction.staff.as_deref());
    if let Some(sound) = &direction.sound {
        write_sound(w, sound);
    }

    w.close("direction");
}

fn write_direction_type(w: &mut XmlWriter, direction_type: &DirectionType) {
    match direction_type {
        DirectionType::Words(words) => {
            let attrs: Vec<(&str, String)> = match &words.lang {
                Some(lang) => vec![("lang", lang.clone())],
                None => Vec::new(),
            };
            w.leaf_attrs("words", &attrs, &words.text);
        }
        DirectionType::Dynamics(dynamics) => {
            w.open("dynamics");
            for mark in &dynamics.marks {
                w.empty(mark.name());
            }
            w.close("dynamics");
        }
        DirectionType::Wedge(wedge) => {
            let mut attrs = vec![("type", wedge.wedge_type.name().to_string())];
            if let Some(number) = wedge.number {
                attrs.push(("number", number.to_string()));
            }
            if let Some(spread) = wedge.spread {
                attrs.push(("spread", num(spread)));
            }
            w.empty_attrs("wedge", &attrs);
        }
        DirectionType::Metronome(metronome) => {
            w.open("metronome");
            w.leaf("beat-unit", metronome.beat_unit.name());
            if metronome.beat_unit_dot {
                w.empty("beat-unit-dot");
            }
            w.leaf("per-minute", &metronome.per_minute);
            w.close("metronome");
        }
        DirectionType::Segno => w.empty("segno"),
        DirectionType::Coda => w.empty("coda"),
        DirectionType::Rehearsal(text) => w.leaf("rehearsal", text),
        DirectionType::OctaveShift { shift_type, size } => {
            w.empty_attrs(
                "octave-shift",
                &[
                    ("type", shift_type.name().to_string()),
                    ("size", size.to_string()),
                ],
            );
        }
        DirectionType::Pedal { pedal_type, line } => {
            w.empty_attrs(
                "pedal",
                &[
                    ("type", pedal_type.name().to_string()),
                    ("line", yes_no(*line).to_string()),
                ],
            );
        }
        DirectionType::Dashes { dashes_type, number } => {
            let mut attrs = vec![("type", dashes_type.name().to_string())];
            if let Some(number) = number {
                attrs.push(("number", number.to_string()));
            }
            w.empty_attrs("dashes", &attrs);
        }
        DirectionType::Bracket { bracket_type, number, line_end } => {
            let mut attrs = vec![("type", bracket_type.name().to_string())];
            if let Some(number) = number {
                attrs.push(("number", number.to_string()));
            }
            if let Some(line_end) = line_end {
                attrs.push(("line-end", line_end.clone()));
            }
            w.empty_attrs("bracket", &attrs);
        }
    }
}

fn write_sound(w: &mut XmlWriter, sound: &Sound) {
    let mut attrs = Vec::new();
    if let Some(tempo) = sound.tempo {
        attrs.push(("tempo", num(tempo)));
    }
    if let Some(dynamics) = sound.dynamics {
        attrs.push(("dynamics", num(dynamics)));
    }
    if sound.dacapo {
        attrs.push(("dacapo", "yes".to_string()));
    }
    if let Some(segno) = &sound.segno {
        attrs.push(("segno", segno.clone()));
    }
    if let Some(coda) = &sound.coda {
        attrs.push(("coda", coda.clone()));
    }
    if let Some(fine) = &sound.fine {
        attrs.push(("fine", fine.clone()));
    }
    if let Some(tocoda) = &sound.tocoda {
        attrs.push(("tocoda", tocoda.clone()));
    }
    if let Some(pizzicato) = sound.pizzicato {
        attrs.push(("pizzicato", yes_no(pizzicato).to_string()));
    }
    w.empty_attrs("sound", &attrs);
}

fn write_barline(w: &mut XmlWriter, barline: &Barline) {
    let attrs: Vec<(&str, String)> = match barline.location {
        Some(location) => vec![("location", location.name().to_string())],
        None => Vec::new(),
    };
    w.open_attrs("barline", &attrs);
    if let Some(style) = barline.bar_style {
        w.leaf("bar-style", style.name());
    }
    if let Some(ending) = &barline.ending {
        let attrs = [
            ("number", ending.number.clone()),
            ("type", ending.ending_type.name().to_string()),
        ];
        match &ending.text {
            Some(text) => w.leaf_attrs("ending", &attrs, text),
            None => w.empty_attrs("ending", &attrs),
        }
    }
    if let Some(repeat) = &barline.repeat {
        let mut attrs = vec![("direction", repeat.direction.name().to_string())];
        if let Some(times) = repeat.times {
            attrs.push(("times", times.to_string()));
        }
        w.empty_attrs("repeat", &attrs);
    }
    w.close("barline");
}

// ---------------------------------------------------------------------------
// harmony and friends
// ---------------------------------------------------------------------------

fn write_harmony(w: &mut XmlWriter, harmony: &Harmony) {
    w.open("harmony");
    if let Some(root) = &harmony.root {
        w.open("root");
        w.leaf("root-step", root.step.letter());
        if let Some(alter) = root.alter {
            w.leaf("root-alter", &num(alter));
        }
        w.close("root");
    }
    w.leaf_opt("function", harmony.function.as_deref());
    w.leaf("kind", &harmony.kind);
    if let Some(bass) = &harmony.bass {
        w.open("bass");
        w.leaf("bass-step", bass.step.letter());
        if let Some(alter) = bass.alter {
            w.leaf("bass-alter", &num(alter));
        }
        w.close("bass");
    }
    for degree in &harmony.degrees {
        w.open("degree");
        w.leaf("degree-value", &degree.value.to_string());
        if let Some(alter) = degree.alter {
            w.leaf("degree-alter", &num(alter));
        }
        w.leaf("degree-type", degree.degree_type.name());
        w.close("degree");
    }
    if let Some(frame) = &harmony.frame {
        w.open("frame");
        w.leaf("frame-strings", &frame.strings.to_string());
        w.leaf("frame-frets", &frame.frets.to_string());
        if let Some(first_fret) = frame.first_fret {
            w.leaf("first-fret", &first_fret.to_string());
        }
        for note in &frame.notes {
            w.open("frame-note");
            w.leaf("string", &note.string.to_string());
            w.leaf("fret", &note.fret.to_string());
            w.leaf_opt("fingering", note.fingering.as_deref());
            w.close("frame-note");
        }
        w.close("frame");
    }
    w.close("harmony");
}

fn write_figured_bass(w: &mut XmlWriter, figured: &FiguredBass) {
    let attrs: Vec<(&str, String)> = if figured.parentheses {
        vec![("parentheses", "yes".to_string())]
    } else {
        Vec::new()
    };
    w.open_attrs("figured-bass", &attrs);
    for figure in &figured.figures {
        w.open("figure");
        w.leaf_opt("prefix", figure.prefix.as_deref());
        w.leaf_opt("figure-number", figure.number.as_deref());
        w.leaf_opt("suffix", figure.suffix.as_deref());
        w.close("figure");
    }
    if let Some(duration) = figured.duration {
        w.leaf("duration", &duration.to_string());
    }
    w.close("figured-bass");
}

fn write_print(w: &mut XmlWriter, print: &Print) {
    let mut attrs = Vec::new();
    if let Some(new_system) = print.new_system {
        attrs.push(("new-system", yes_no(new_system).to_string()));
    }
    if let Some(new_page) = print.new_page {
        attrs.push(("new-page", yes_no(new_page).to_string()));
    }
    if let Some(blank_page) = print.blank_page {
        attrs.push(("blank-page", blank_page.to_string()));
    }
    if let Some(page_number) = &print.page_number {
        attrs.push(("page-number", page_number.clone()));
    }
    if print.page_layout.is_none() && print.system_layout.is_none() && print.staff_layouts.is_empty()
    {
        w.empty_attrs("print", &attrs);
        return;
    }
    w.open_attrs("print", &attrs);
    if let Some(page_layout) = &print.page_layout {
        write_page_layout(w, page_layout);
    }
    if let Some(system_layout) = &print.system_layout {
        write_system_layout(w, system_layout);
    }
    for staff_layout in &print.staff_layouts {
        write_staff_layout(w, staff_layout);
    }
    w.close("print");
}

fn write_grouping(w: &mut XmlWriter, grouping: &Grouping) {
    let mut attrs = vec![("type", grouping.grouping_type.name().to_string())];
    if let Some(number) = &grouping.number {
        attrs.push(("number", number.clone()));
    }
    if grouping.features.is_empty() {
        w.empty_attrs("grouping", &attrs);
        return;
    }
    w.open_attrs("grouping", &attrs);
    for feature in &grouping.features {
        let attrs: Vec<(&str, String)> = match &feature.feature_type {
            Some(feature_type) => vec![("type", feature_type.clone())],
            None => Vec::new(),
        };
        w.leaf_attrs("feature", &attrs, &feature.value);
    }
    w.close("grouping");
}

fn write_link(w: &mut XmlWriter, link: &Link) {
    // The xlink namespace is declared inline so the element stands alone
    let mut attrs = vec![
        ("xmlns:xlink", "http://www.w3.org/1999/xlink".to_string()),
        ("xlink:href", link.href.clone()),
    ];
    if let Some(name) = &link.name {
        attrs.push(("name", name.clone()));
    }
    if let Some(element) = &link.element {
        attrs.push(("element", element.clone()));
    }
    if let Some(position) = link.position {
        attrs.push(("position", position.to_string()));
    }
    w.empty_attrs("link", &attrs);
}

fn write_bookmark(w: &mut XmlWriter, bookmark: &Bookmark) {
    let mut attrs = vec![("id", bookmark.id.clone())];
    if let Some(name) = &bookmark.name {
        attrs.push(("name", name.clone()));
    }
    w.empty_attrs("bookmark", &attrs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::note::{Pitch, Step};

    #[test]
    fn test_escape() {
        assert_eq!(xml_escape("a & b < c"), "a &amp; b &lt; c");
        assert_eq!(xml_escape("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(-2.0), "-2");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(83.25), "83.25");
    }

    #[test]
    fn test_written_document_has_header_and_doctype() {
        let mut score = ScorePartwise::new();
        score
            .part_list
            .entries
            .push(crate::models::score::PartListEntry::ScorePart(
                crate::models::score::ScorePart::new("P1", "Voice"),
            ));
        let mut part = crate::models::measure::Part::new("P1");
        let mut measure = crate::models::measure::Measure::new("1");
        measure
            .add_note(Note::pitched(Pitch::natural(Step::C, 4), 4).unwrap())
            .unwrap();
        part.measures.push(measure);
        score.parts.push(part);

        let xml = score.to_xml();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains("<!DOCTYPE score-partwise"));
        assert!(xml.contains("<score-partwise version=\"2.0\">"));
        assert!(xml.contains("<step>C</step>"));
        assert!(xml.contains("<octave>4</octave>"));
    }

    #[test]
    fn test_alter_zero_is_omitted() {
        let mut w = XmlWriter::new();
        let note = Note::pitched(Pitch::natural(Step::D, 5), 2).unwrap();
        write_note(&mut w, &note);
        let xml = w.finish();
        assert!(!xml.contains("<alter>"));
        assert!(xml.contains("<step>D</step>"));
    }
}
