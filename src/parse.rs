// Copyright © 2018 Cormac O'Brien
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of this software
// and associated documentation files (the "Software"), to deal in the Software without
// restriction, including without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all copies or
// substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
// BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.


use std::collections::HashMap;

use nom::{
    bytes::complete::{tag, take_while},
    character::complete::multispace0,
    combinator::map,
    multi::many0,
    sequence::{delimited, preceded, separated_pair, terminated},
};

pub type Entity<'a> = HashMap<&'a str, &'a str>;

// contents may be empty ("")
pub fn quoted(input: &str) -> nom::IResult<&str, &str> {
    delimited(tag("\""), take_while(|c: char| c != '"'), tag("\""))(input)
}

// "name" "value"
pub fn entity_attribute(input: &str) -> nom::IResult<&str, (&str, &str)> {
    separated_pair(quoted, multispace0, quoted)(input)
}

// {
// "name1" "value1"
// "name2" "value2"
// }
pub fn entity(input: &str) -> nom::IResult<&str, Entity> {
    delimited(
        terminated(tag("{"), multispace0),
        map(many0(terminated(entity_attribute, multispace0)), |attrs| {
            attrs.into_iter().collect()
        }),
        tag("}"),
    )(input)
}

pub fn entities(input: &str) -> nom::IResult<&str, Vec<Entity>> {
    preceded(multispace0, many0(terminated(entity, multispace0)))(input)
}

/// Returns the value of `key` on the worldspawn entity of an entity string.
///
/// The worldspawn is the entity whose classname is `worldspawn`; if none is tagged, the first
/// entity is used.
pub fn worldspawn_value(src: &str, key: &str) -> Option<String> {
    let ents = match entities(src) {
        Ok((rest, ents)) => {
            if !rest.is_empty() {
                warn!("Ignoring {} unparsed bytes of entity string", rest.len());
            }
            ents
        }
        Err(e) => {
            warn!("Failed to parse entity string: {:?}", e);
            return None;
        }
    };

    let world = match ents
        .iter()
        .find(|e| e.get("classname") == Some(&"worldspawn"))
    {
        Some(w) => w,
        None => {
            warn!("No worldspawn entity, using the first entity");
            ents.first()?
        }
    };

    world.get(key).map(|v| (*v).to_owned())
}
