use chrono::{NaiveDate, NaiveDateTime};
use ficha_cadastro::canvas::{Align, PageCanvas, Paint};
use ficha_cadastro::document::{lay_out, TITLE};
use ficha_cadastro::layout::MARGIN_MM;
use ficha_cadastro::metrics::FontStyle;
use ficha_cadastro::{Field, FormSnapshot, Result};
use image::{DynamicImage, Rgba, RgbaImage};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Text {
        page: usize,
        text: String,
        x: f32,
        y: f32,
        align: Align,
        size: f32,
        bold: bool,
    },
    Rect {
        page: usize,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        fill: Option<u8>,
    },
    Line {
        page: usize,
        y: f32,
    },
    Image {
        page: usize,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
}

#[derive(Default)]
struct RecordingCanvas {
    ops: Vec<Op>,
    page: usize,
    size: f32,
    style: Option<FontStyle>,
}

impl PageCanvas for RecordingCanvas {
    fn page_size(&self) -> (f32, f32) {
        (PAGE_W, PAGE_H)
    }

    fn add_page(&mut self) {
        self.page += 1;
    }

    fn page_count(&self) -> usize {
        self.page + 1
    }

    fn set_font(&mut self, size_pt: f32, style: FontStyle) {
        self.size = size_pt;
        self.style = Some(style);
    }

    fn set_text_gray(&mut self, _level: u8) {}

    fn text(&mut self, text: &str, x: f32, y: f32, align: Align) {
        self.ops.push(Op::Text {
            page: self.page,
            text: text.to_string(),
            x,
            y,
            align,
            size: self.size,
            bold: self.style == Some(FontStyle::Bold),
        });
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint) {
        self.ops.push(Op::Rect { page: self.page, x, y, w, h, fill: paint.fill });
    }

    fn line(&mut self, _x1: f32, y1: f32, _x2: f32, _y2: f32, _gray: u8) {
        self.ops.push(Op::Line { page: self.page, y: y1 });
    }

    fn image(&mut self, _image: &DynamicImage, x: f32, y: f32, w: f32, h: f32) {
        self.ops.push(Op::Image { page: self.page, x, y, w, h });
    }

    fn finish(self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

impl RecordingCanvas {
    fn texts(&self) -> Vec<(usize, &str)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { page, text, .. } => Some((*page, text.as_str())),
                _ => None,
            })
            .collect()
    }

    fn count_text(&self, wanted: &str) -> usize {
        self.texts().iter().filter(|(_, t)| *t == wanted).count()
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn generated_at() -> NaiveDateTime {
    today().and_hms_opt(10, 30, 0).unwrap()
}

fn logo() -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(300, 300, Rgba([200, 0, 0, 255])))
}

fn signature() -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(120, 40, Rgba([0, 0, 0, 255])))
}

fn ana_souza() -> FormSnapshot {
    let mut form = FormSnapshot::new(today());
    form.apply(Field::FullName, "Ana Souza");
    form.apply(Field::BirthDate, "2000-01-15");
    form.apply(Field::Weight, "60");
    form.apply(Field::Address, "Rua A, 123");
    form.apply(Field::EmergencyPhone, "71999998888");
    form.apply(Field::DueDay, "15");
    form.apply(Field::Restriction, "Não");
    form.apply(Field::Medication, "Não");
    form.apply(Field::PriorActivity, "Não");
    form
}

fn render(form: &FormSnapshot, signature: Option<&DynamicImage>) -> RecordingCanvas {
    lay_out(RecordingCanvas::default(), form, signature, &logo(), generated_at()).into_canvas()
}

const CARD_LABELS: [&str; 14] = [
    "Nome completo",
    "Data de nascimento",
    "Idade",
    "Peso (kg)",
    "Endereço",
    "Telefone",
    "Contato emergência",
    "Responsável (se menor de idade)",
    "Telefone responsável",
    "Dia vencimento mensalidade",
    "Data do cadastro",
    "Restrição médica",
    "Medicamentos contínuos",
    "Atividade anterior",
];

#[test]
fn test_first_page_has_logo_title_and_personal_section() {
    let canvas = render(&ana_souza(), Some(&signature()));

    let Op::Image { page, x, y, w, h } = canvas.ops[0].clone() else {
        panic!("logo is not drawn first: {:?}", canvas.ops[0]);
    };
    assert_eq!(page, 0);
    assert_eq!((w, h), (86.0, 86.0));
    assert!((x + w / 2.0 - PAGE_W / 2.0).abs() < 1e-3, "logo is not centered");
    assert_eq!(y, MARGIN_MM);

    let title = canvas
        .ops
        .iter()
        .find_map(|op| match op {
            Op::Text { page, text, x, align, size, bold, .. } if text == TITLE => {
                Some((*page, *x, *align, *size, *bold))
            }
            _ => None,
        })
        .expect("title drawn");
    assert_eq!(title, (0, PAGE_W / 2.0, Align::Center, 18.0, true));

    assert!(canvas.texts().contains(&(0, "Informações Pessoais")));
}

#[test]
fn test_values_are_rendered_in_display_form() {
    let canvas = render(&ana_souza(), Some(&signature()));
    let texts: Vec<&str> = canvas.texts().into_iter().map(|(_, t)| t).collect();

    assert!(texts.contains(&"Ana Souza"));
    assert!(texts.contains(&"15/01/2000"));
    assert!(texts.contains(&"26"));
    assert!(texts.contains(&"(71) 99999-8888"));
    assert!(texts.contains(&"16/10/2026"));
    assert!(texts.contains(&"Gerado em: 16/10/2026 10:30"));
    // phone, guardian name and guardian phone were left blank
    assert_eq!(canvas.count_text("-"), 3);
    assert_eq!(canvas.count_text("Não"), 3);
}

#[test]
fn test_content_follows_the_fixed_order() {
    let canvas = render(&ana_souza(), Some(&signature()));
    let texts: Vec<&str> = canvas.texts().into_iter().map(|(_, t)| t).collect();

    let mut expected: Vec<&str> = vec![TITLE, "Informações Pessoais"];
    expected.extend(&CARD_LABELS[..11]);
    expected.push("Saúde");
    expected.extend(&CARD_LABELS[11..]);
    expected.push("Assinatura");

    let positions: Vec<usize> = expected
        .iter()
        .map(|label| {
            texts
                .iter()
                .position(|t| t == label)
                .unwrap_or_else(|| panic!("{} missing", label))
        })
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "out of order: {:?}", positions);
}

#[test]
fn test_yes_answer_shows_detail() {
    let mut form = ana_souza();
    form.apply(Field::Restriction, "Sim");
    form.apply(Field::RestrictionDetail, "Joelho");
    let canvas = render(&form, Some(&signature()));
    assert_eq!(canvas.count_text("Sim — Joelho"), 1);
    assert_eq!(canvas.count_text("Não"), 2);
}

#[test]
fn test_signature_box_centers_image() {
    let canvas = render(&ana_souza(), Some(&signature()));
    let images: Vec<&Op> = canvas.ops.iter().filter(|op| matches!(op, Op::Image { .. })).collect();
    assert_eq!(images.len(), 2);

    let Op::Image { x, w, h, .. } = images[1] else { unreachable!() };
    assert_eq!((*w, *h), (90.0, 28.0));
    assert!((x + w / 2.0 - PAGE_W / 2.0).abs() < 1e-3);
}

#[test]
fn test_no_signature_section_without_signature() {
    let canvas = render(&ana_souza(), None);
    assert_eq!(canvas.count_text("Assinatura"), 0);
    assert_eq!(canvas.ops.iter().filter(|op| matches!(op, Op::Image { .. })).count(), 1);
}

#[test]
fn test_two_column_cards_share_height() {
    let mut form = ana_souza();
    form.apply(Field::GuardianName, &"Maria Aparecida dos Santos Oliveira ".repeat(4));
    let canvas = render(&form, Some(&signature()));

    let cards: Vec<(f32, f32, f32)> = canvas
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::Rect { y, w, h, fill: Some(255), .. } if *w < 100.0 => Some((*y, *w, *h)),
            _ => None,
        })
        .collect();
    assert_eq!(cards.len(), 10);
    for pair in cards.chunks(2) {
        assert_eq!(pair[0].0, pair[1].0);
        assert_eq!(pair[0].2, pair[1].2);
    }
    let guardian_row = cards[6];
    assert!(guardian_row.2 > cards[0].2, "guardian row did not grow");
}

#[test]
fn test_long_values_paginate_without_losing_content() {
    let long = "Texto bastante longo para ocupar várias linhas no cartão. ".repeat(25);
    let mut form = ana_souza();
    form.apply(Field::Address, &long);
    for (answer, detail) in [
        (Field::Restriction, Field::RestrictionDetail),
        (Field::Medication, Field::MedicationDetail),
        (Field::PriorActivity, Field::PriorActivityDetail),
    ] {
        form.apply(answer, "Sim");
        form.apply(detail, &long);
    }

    let short = render(&ana_souza(), Some(&signature()));
    let canvas = render(&form, Some(&signature()));
    assert!(
        canvas.page_count() > short.page_count(),
        "expected extra pages: {} vs {}",
        canvas.page_count(),
        short.page_count()
    );

    for label in CARD_LABELS {
        let count = canvas.count_text(label);
        assert_eq!(count, 1, "{} drawn {} times", label, count);
    }

    // Every block stays above the bottom margin; only the footer sits in it.
    for op in &canvas.ops {
        match op {
            Op::Rect { y, h, .. } => assert!(y + h <= PAGE_H - MARGIN_MM + 1e-3, "{:?}", op),
            Op::Text { text, y, .. } if !text.starts_with("Gerado em") => {
                assert!(*y <= PAGE_H - MARGIN_MM, "{:?}", op)
            }
            _ => {}
        }
    }

    let footer_page = canvas
        .texts()
        .into_iter()
        .find(|(_, t)| t.starts_with("Gerado em"))
        .map(|(p, _)| p);
    assert_eq!(footer_page, Some(canvas.page_count() - 1));
}

/// Texts drawn after the `from` label and before the `to` label.
fn texts_between<'a>(
    canvas: &'a RecordingCanvas,
    from: &str,
    to: &str,
) -> Vec<(usize, &'a str)> {
    canvas
        .texts()
        .into_iter()
        .skip_while(|(_, t)| *t != from)
        .skip(1)
        .take_while(|(_, t)| *t != to)
        .collect()
}

fn assert_inside_margins(canvas: &RecordingCanvas) {
    for op in &canvas.ops {
        match op {
            Op::Rect { y, h, .. } => assert!(y + h <= PAGE_H - MARGIN_MM + 1e-3, "{:?}", op),
            Op::Text { text, y, .. } if !text.starts_with("Gerado em") => {
                assert!(*y <= PAGE_H - MARGIN_MM, "{:?}", op)
            }
            _ => {}
        }
    }
}

#[test]
fn test_card_taller_than_a_page_continues_on_next_pages() {
    let address = "Rua das Flores numero cento e vinte tres ".repeat(250);
    let mut form = ana_souza();
    form.apply(Field::Address, &address);
    let canvas = render(&form, Some(&signature()));

    assert!(canvas.page_count() >= 3, "pages: {}", canvas.page_count());
    assert_inside_margins(&canvas);
    assert_eq!(canvas.count_text("Endereço"), 1);

    let lines = texts_between(&canvas, "Endereço", "Telefone");
    let drawn: Vec<&str> = lines.iter().map(|(_, t)| *t).collect();
    let expected = address.split_whitespace().collect::<Vec<_>>().join(" ");
    assert_eq!(drawn.join(" "), expected);

    // The address alone spans more than one page
    let pages: std::collections::BTreeSet<usize> = lines.iter().map(|(p, _)| *p).collect();
    assert!(pages.len() >= 2, "{:?}", pages);
}

#[test]
fn test_two_column_row_taller_than_a_page_keeps_both_columns() {
    let guardian = "Maria Aparecida dos Santos Oliveira ".repeat(200);
    let mut form = ana_souza();
    form.apply(Field::GuardianName, &guardian);
    form.apply(Field::GuardianPhone, "71988887777");
    let canvas = render(&form, Some(&signature()));

    assert_inside_margins(&canvas);
    assert_eq!(canvas.count_text("Responsável (se menor de idade)"), 1);
    assert_eq!(canvas.count_text("Telefone responsável"), 1);
    assert_eq!(canvas.count_text("(71) 98888-7777"), 1);

    let drawn: Vec<&str> =
        texts_between(&canvas, "Responsável (se menor de idade)", "Dia vencimento mensalidade")
            .into_iter()
            .map(|(_, t)| t)
            .filter(|t| *t != "Telefone responsável" && *t != "(71) 98888-7777")
            .collect();
    let expected = guardian.split_whitespace().collect::<Vec<_>>().join(" ");
    assert_eq!(drawn.join(" "), expected);

    // Pieces of the same row on one page share their top and height
    let narrow: Vec<(usize, f32, f32)> = canvas
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::Rect { page, y, w, h, fill: Some(255), .. } if *w < 100.0 => Some((*page, *y, *h)),
            _ => None,
        })
        .collect();
    assert_eq!(narrow.len() % 2, 0);
    for pair in narrow.chunks(2) {
        assert_eq!(pair[0], pair[1]);
    }
}
