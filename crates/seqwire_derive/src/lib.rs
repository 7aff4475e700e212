use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DataStruct, DeriveInput, Fields, GenericParam, Index, parse_macro_input, parse_quote,
};

/// Derives `seqwire::Codec` for a struct by encoding its fields in declaration
/// order, with no framing of its own.
///
/// Inside a compiled collection codec, collection-typed fields use codecs from
/// the same registry.
#[proc_macro_derive(Codec)]
pub fn derive_codec(input: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(input as DeriveInput);
    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(DataStruct { fields, .. }) => fields,
        _ => {
            return syn::Error::new_spanned(&input.ident, "Codec can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    let types: Vec<_> = fields.iter().map(|f| &f.ty).collect();
    let slots: Vec<_> = (0..types.len()).map(Index::from).collect();

    let (encode_body, decode_body, item_encode_body, item_decode_body) = match fields {
        Fields::Named(named) => {
            let names: Vec<_> = named.named.iter().filter_map(|f| f.ident.as_ref()).collect();
            (
                quote! { #(::seqwire::Codec::encode(&self.#names, sink)?;)* },
                quote! { Self { #(#names: ::seqwire::Codec::decode(source)?,)* } },
                quote! {
                    #(::seqwire::ItemCodec::encode_item(&*encoders.#slots, sink, &value.#names)?;)*
                },
                quote! {
                    Self { #(#names: ::seqwire::ItemCodec::decode_item(&*decoders.#slots, source)?,)* }
                },
            )
        }
        Fields::Unnamed(_) => {
            let decoders = slots
                .iter()
                .map(|_| quote! { ::seqwire::Codec::decode(source)? });
            (
                quote! { #(::seqwire::Codec::encode(&self.#slots, sink)?;)* },
                quote! { Self(#(#decoders),*) },
                quote! {
                    #(::seqwire::ItemCodec::encode_item(&*encoders.#slots, sink, &value.#slots)?;)*
                },
                quote! {
                    Self(#(::seqwire::ItemCodec::decode_item(&*decoders.#slots, source)?),*)
                },
            )
        }
        Fields::Unit => (quote! {}, quote! { Self }, quote! {}, quote! { Self }),
    };

    // Field codecs come from the registry compiling the enclosing collection,
    // so nested collections honor its options.
    let item_codec = if types.is_empty() {
        quote! {}
    } else {
        quote! {
            fn item_codec(
                registry: &::seqwire::CodecRegistry,
            ) -> ::seqwire::Result<::std::sync::Arc<dyn ::seqwire::ItemCodec<Self>>> {
                let decoders = ::std::sync::Arc::new((
                    #(<#types as ::seqwire::Codec>::item_codec(registry)?,)*
                ));
                let encoders = decoders.clone();
                let codec: ::std::sync::Arc<dyn ::seqwire::ItemCodec<Self>> =
                    ::std::sync::Arc::new(::seqwire::FnCodec::new(
                        move |sink: &mut dyn ::seqwire::Sink, value: &Self| {
                            #item_encode_body
                            Ok(())
                        },
                        move |source: &mut dyn ::seqwire::Source| Ok(#item_decode_body),
                    ));
                Ok(codec)
            }
        }
    };

    // Every type parameter must itself be a Codec.
    for param in input.generics.params.iter_mut() {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::seqwire::Codec));
        }
    }
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::seqwire::Codec for #struct_name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn encode(&self, sink: &mut dyn ::seqwire::Sink) -> ::seqwire::Result<()> {
                #encode_body
                Ok(())
            }

            #[allow(unused_variables)]
            fn decode(source: &mut dyn ::seqwire::Source) -> ::seqwire::Result<Self> {
                Ok(#decode_body)
            }

            #item_codec
        }
    };

    TokenStream::from(expanded)
}
