//! URL input component

use crate::gui::app::Message;
use crate::gui::theme;
use iced::widget::{button, row, text, text_input, tooltip};
use iced::{Alignment, Element, Length};

/// Link field with a paste button. Editing is locked while a download runs.
pub fn url_input(value: &str, locked: bool) -> Element<'static, Message> {
    let mut input = text_input("link", value).padding(10).width(Length::Fill);
    if !locked {
        input = input
            .on_input(Message::UrlInputChanged)
            .on_submit(Message::DownloadButtonPressed);
    }

    row![
        input,
        tooltip(
            button(text("Paste").size(14))
                .on_press_maybe((!locked).then_some(Message::PasteFromClipboard))
                .padding([8, 12])
                .style(iced::theme::Button::Custom(Box::new(theme::MutedButton))),
            "Paste from clipboard",
            tooltip::Position::Bottom,
        ),
    ]
    .spacing(8)
    .align_items(Alignment::Center)
    .into()
}
