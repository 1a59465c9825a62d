use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{ItemFn, LitStr, parse_macro_input};

pub fn timer_inner(attr: TokenStream, item: TokenStream) -> TokenStream {
    let label = if attr.is_empty() {
        None
    } else {
        Some(parse_macro_input!(attr as LitStr).value())
    };
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = parse_macro_input!(item as ItemFn);

    let fn_name = sig.ident.to_string();
    let full_label = match label {
        Some(label) if !label.is_empty() => format!("{label}.{fn_name}"),
        _ => fn_name,
    };
    let label_lit = LitStr::new(&full_label, Span::call_site());
    let stmts = &block.stmts;

    // The guard logs on drop so early returns and `?` are timed too.
    let expanded = quote! {
        #(#attrs)*
        #vis #sig {
            struct __CityTourTimer {
                label: &'static str,
                start: std::time::Instant,
            }

            impl Drop for __CityTourTimer {
                fn drop(&mut self) {
                    log::debug!("{}: elapsed={:.2?}", self.label, self.start.elapsed());
                }
            }

            let __city_tour_timer = __CityTourTimer {
                label: #label_lit,
                start: std::time::Instant::now(),
            };

            #(#stmts)*
        }
    };

    TokenStream::from(expanded)
}
