//! Server-rendered pages. Plain string assembly with escaping; layout and
//! styling stay minimal on purpose.

use crate::contact::{all_non_favourite, Contact};
use crate::validate::ValidationError;

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

fn message_block(messages: &[String]) -> String {
    messages
        .iter()
        .map(|msg| format!("<p class=\"msg\">{}</p>\n", escape_html(msg)))
        .collect()
}

fn error_block(errors: &[ValidationError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|err| format!("<li>{}</li>", escape_html(&err.to_string())))
        .collect();
    format!("<ul class=\"errors\">{items}</ul>\n")
}

fn contact_row(contact: &Contact) -> String {
    let name = escape_html(&contact.name);
    let checked = if contact.is_favourite { " checked" } else { "" };
    format!(
        "<tr>\
         <td><img src=\"/{img}\" alt=\"{name}\" width=\"48\"></td>\
         <td><a href=\"/{name}\">{name}</a></td>\
         <td>{email}</td>\
         <td>{num}</td>\
         <td><form method=\"post\" action=\"/favourite/{name}\">\
         <input type=\"checkbox\" name=\"isFavourite\"{checked} onchange=\"this.form.submit()\">\
         </form></td>\
         <td><a href=\"/update/{name}\">update</a> <a href=\"/delete/{name}\">delete</a></td>\
         </tr>\n",
        img = escape_html(&contact.img),
        email = escape_html(&contact.email),
        num = escape_html(&contact.num),
    )
}

pub fn index_page(contacts: &[Contact], messages: &[String], from_search: bool) -> String {
    let mut body = String::from("<h1>Contact Page</h1>\n");
    body.push_str(&message_block(messages));
    body.push_str(
        "<form method=\"post\" action=\"/search\">\
         <input type=\"text\" name=\"search\" placeholder=\"Search by name\">\
         <button type=\"submit\">Search</button></form>\n",
    );
    body.push_str("<p><a href=\"/add\">Add contact</a></p>\n");
    if from_search {
        body.push_str("<p class=\"search-note\">Showing search results</p>\n");
    }
    if all_non_favourite(contacts) {
        body.push_str("<p class=\"no-favourites\">No favourite contacts yet</p>\n");
    }
    body.push_str(
        "<table>\n<tr><th></th><th>Name</th><th>Email</th><th>Phone</th>\
         <th>Favourite</th><th></th></tr>\n",
    );
    for contact in contacts {
        body.push_str(&contact_row(contact));
    }
    body.push_str("</table>\n");
    layout("Contact Page", &body)
}

fn contact_fields(name: &str, email: &str, num: &str) -> String {
    format!(
        "<label>Name <input type=\"text\" name=\"name\" value=\"{}\" required></label><br>\n\
         <label>Email <input type=\"text\" name=\"email\" value=\"{}\" required></label><br>\n\
         <label>Phone <input type=\"text\" name=\"num\" value=\"{}\" required></label><br>\n\
         <label>Image <input type=\"file\" name=\"img\"></label><br>\n",
        escape_html(name),
        escape_html(email),
        escape_html(num),
    )
}

pub fn add_page(errors: &[ValidationError]) -> String {
    let mut body = String::from("<h1>Add Contact Page</h1>\n");
    body.push_str(&error_block(errors));
    body.push_str("<form method=\"post\" action=\"/\" enctype=\"multipart/form-data\">\n");
    body.push_str(&contact_fields("", "", ""));
    body.push_str("<button type=\"submit\">Add</button>\n</form>\n");
    body.push_str("<p><a href=\"/\">Back</a></p>\n");
    layout("Add Contact Page", &body)
}

pub fn update_page(contact: &Contact, errors: &[ValidationError]) -> String {
    let mut body = String::from("<h1>Update Contact Page</h1>\n");
    body.push_str(&error_block(errors));
    body.push_str("<form method=\"post\" action=\"/update\" enctype=\"multipart/form-data\">\n");
    body.push_str(&format!(
        "<input type=\"hidden\" name=\"oldName\" value=\"{}\">\n",
        escape_html(&contact.name)
    ));
    body.push_str(&contact_fields(&contact.name, &contact.email, &contact.num));
    body.push_str("<button type=\"submit\">Update</button>\n</form>\n");
    body.push_str("<p><a href=\"/\">Back</a></p>\n");
    layout("Update Contact Page", &body)
}

pub fn detail_page(contact: &Contact) -> String {
    let favourite = if contact.is_favourite { "yes" } else { "no" };
    let body = format!(
        "<h1>Detail Page</h1>\n\
         <img src=\"/{img}\" alt=\"{name}\" width=\"160\">\n\
         <p>Name: {name}</p>\n\
         <p>Email: {email}</p>\n\
         <p>Phone: {num}</p>\n\
         <p>Favourite: {favourite}</p>\n\
         <p><a href=\"/\">Back</a></p>\n",
        img = escape_html(&contact.img),
        name = escape_html(&contact.name),
        email = escape_html(&contact.email),
        num = escape_html(&contact.num),
    );
    layout("Detail Page", &body)
}
